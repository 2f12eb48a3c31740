use std::collections::VecDeque;

use blockdeq::desc::PlainDesc;
use blockdeq::BlockDeque;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_push_back_100(b: &mut Criterion) {
    let mut deq = BlockDeque::new(PlainDesc::<i32>::new()).unwrap();
    let mut b = b.benchmark_group("push back");
    b.bench_function("push back", |b| {
        b.iter(|| {
            for i in 0..100 {
                deq.push_back(&i).unwrap();
            }
            std::hint::black_box(&deq);
            deq.clear();
        })
    });
    let mut deq = VecDeque::with_capacity(128);
    b.bench_function("push back vecdeque", |b| {
        b.iter(|| {
            for i in 0..100 {
                deq.push_back(i);
            }
            std::hint::black_box(&deq);
            deq.clear();
        })
    });
    b.finish();
}

fn bench_push_front_100(b: &mut Criterion) {
    let mut deq = BlockDeque::new(PlainDesc::<i32>::new()).unwrap();
    let mut b = b.benchmark_group("push front");
    b.bench_function("push front", |b| {
        b.iter(|| {
            for i in 0..100 {
                deq.push_front(&i).unwrap();
            }
            std::hint::black_box(&deq);
            deq.clear();
        })
    });
    let mut deq = VecDeque::with_capacity(128);
    b.bench_function("push front vecdeque", |b| {
        b.iter(|| {
            for i in 0..100 {
                deq.push_front(i);
            }
            std::hint::black_box(&deq);
            deq.clear();
        })
    });
    b.finish();
}

fn bench_pop_back_100(b: &mut Criterion) {
    let size = 100;
    let deq = {
        let mut d = BlockDeque::new(PlainDesc::<i32>::new()).unwrap();
        for i in 1..size {
            d.push_back(&i).unwrap();
        }
        d
    };

    b.bench_function("pop back", |b| {
        b.iter(|| {
            let mut copy = deq.duplicate().unwrap();
            while !copy.is_empty() {
                std::hint::black_box(copy.pop_back().unwrap());
            }
        })
    });
}

fn bench_insert_middle_100(b: &mut Criterion) {
    let size = 100;
    let deq = {
        let mut d = BlockDeque::new(PlainDesc::<i32>::new()).unwrap();
        for i in 1..size {
            d.push_back(&i).unwrap();
        }
        d
    };

    b.bench_function("insert middle", |b| {
        b.iter(|| {
            let mut copy = deq.duplicate().unwrap();
            for _ in 0..32 {
                let mid = copy.at_offset(copy.len() / 2).unwrap();
                copy.insert(mid, &-1).unwrap();
            }
            std::hint::black_box(&copy);
        })
    });
}

fn bench_cursor_walk_100(b: &mut Criterion) {
    let size = 100;
    let deq = {
        let mut d = BlockDeque::new(PlainDesc::<i32>::new()).unwrap();
        for i in 1..size {
            d.push_back(&i).unwrap();
        }
        d
    };

    b.bench_function("cursor walk", |b| {
        b.iter(|| {
            let mut c = deq.begin();
            let mut sum = 0i64;
            while c != deq.end() {
                sum += *deq.value(c).unwrap().slot().unwrap() as i64;
                c = deq.next(c).unwrap();
            }
            std::hint::black_box(sum);
        })
    });
}

criterion_group!(
    benches,
    bench_push_back_100,
    bench_push_front_100,
    bench_pop_back_100,
    bench_insert_middle_100,
    bench_cursor_walk_100
);
criterion_main!(benches);
