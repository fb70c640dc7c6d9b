use common::{Money, ProductId};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::{CreateOrder, OrderLine, OrderService};
use store::{InMemoryStore, Product};

fn catalog() -> Vec<Product> {
    (1..=50)
        .map(|n| {
            Product::new(
                ProductId::new(n),
                format!("Product {n}"),
                Money::from_cents(i64::from(n) * 250),
            )
        })
        .collect()
}

fn bench_create_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = rt.block_on(InMemoryStore::with_products(catalog()));
    let service = OrderService::new(store);

    c.bench_function("domain/create_order_single_item", |b| {
        b.iter(|| {
            rt.block_on(async {
                service
                    .create_order(CreateOrder::new(1, vec![OrderLine::new(1, 2)]))
                    .await
                    .unwrap();
            });
        });
    });

    c.bench_function("domain/create_order_ten_items", |b| {
        let lines: Vec<OrderLine> = (1..=10).map(|n| OrderLine::new(n, 1)).collect();
        b.iter(|| {
            rt.block_on(async {
                service
                    .create_order(CreateOrder::new(1, lines.clone()))
                    .await
                    .unwrap();
            });
        });
    });
}

fn bench_rejected_order(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = rt.block_on(InMemoryStore::with_products(catalog()));
    let service = OrderService::new(store);

    c.bench_function("domain/create_order_missing_product", |b| {
        b.iter(|| {
            rt.block_on(async {
                let result = service
                    .create_order(CreateOrder::new(
                        1,
                        vec![OrderLine::new(1, 1), OrderLine::new(999, 1)],
                    ))
                    .await;
                assert!(result.is_err());
            });
        });
    });
}

fn bench_list_orders(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = rt.block_on(InMemoryStore::with_products(catalog()));
    let service = OrderService::new(store);
    rt.block_on(async {
        for n in 1..=100 {
            service
                .create_order(CreateOrder::new(n, vec![OrderLine::new(n % 50 + 1, 3)]))
                .await
                .unwrap();
        }
    });

    c.bench_function("domain/list_orders_100", |b| {
        b.iter(|| {
            rt.block_on(async {
                service.list_orders().await.unwrap();
            });
        });
    });
}

criterion_group!(
    benches,
    bench_create_order,
    bench_rejected_order,
    bench_list_orders
);
criterion_main!(benches);
