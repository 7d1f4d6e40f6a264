//! Selection list churn: fill a list, then consume it from the middle the way
//! a multi-sell session does.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use aldon_ui::items::ItemRecord;
use aldon_ui::ui::widgets::SelectionList;

fn filled(len: usize) -> SelectionList<ItemRecord> {
    SelectionList::from_items((0..len).map(|i| ItemRecord::new(format!("Item {}", i))))
}

fn bench_drain_from_middle(c: &mut Criterion) {
    let mut group = c.benchmark_group("drain_from_middle");
    for len in [16usize, 256, 4096] {
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            b.iter(|| {
                let mut list = filled(len);
                let _ = list.select(len / 2);
                while let Some(item) = list.remove_selected() {
                    black_box(item);
                }
            });
        });
    }
    group.finish();
}

fn bench_observed_refresh(c: &mut Criterion) {
    let mut list = filled(256).with_namer(|item: &ItemRecord, i| format!("{:>3} {}", i, item.name));
    let mut seen = 0usize;
    list.subscribe(move |refresh| {
        seen = seen.wrapping_add(refresh.len);
    });
    c.bench_function("refresh_with_namer", |b| {
        b.iter(|| {
            list.refresh(Some("Sold!"));
            black_box(list.names());
        });
    });
}

criterion_group!(benches, bench_drain_from_middle, bench_observed_refresh);
criterion_main!(benches);
