use std::collections::LinkedList;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};

use chunkpool::{ChunkAllocator, Configuration, DoublyLinkedList, HeapPlatform};

const NUMBER_ELEMENTS: usize = 1024;

//  Single-Element Round-Trip.
//
//  This benchmark repeatedly pushes then pops a single element on an empty list.
//
//  This is a best-case scenario for the pool: the first chunk is always free, so the scan stops immediately.
fn single_element_round_trip(c: &mut Criterion) {
    fn bencher<L: Queue>(name: &'static str, c: &mut Criterion, mut list: L) {
        c.bench_function(name, |b| b.iter(|| {
            list.push_back(black_box(42));
            black_box(list.pop_front())
        }));
    }

    let allocator = pool(1);

    bencher("SE Round-trip - std", c, LinkedList::<u64>::new());

    bencher("SE Round-trip - pool", c, DoublyLinkedList::<u64, _>::new(&allocator));
}

criterion_group!(
    single_element,
    single_element_round_trip
);

//  Batch Fill.
//
//  This benchmark repeatedly fills an empty list up to capacity.
//
//  The pool scans past every occupied chunk on each push, so this measures the cost of the linear scan.
//
//  Each list holds every chunk of the pool, hence a single list may be alive at any time.
fn batch_fill(c: &mut Criterion) {
    fn bencher<L: Queue>(name: &'static str, c: &mut Criterion, make: impl Fn() -> L) {
        c.bench_function(name, |b| b.iter_batched_ref(
            &make,
            |list| {
                for i in 0..NUMBER_ELEMENTS {
                    list.push_back(black_box(i as u64));
                }
            },
            BatchSize::PerIteration
        ));
    }

    let allocator = pool(NUMBER_ELEMENTS);

    bencher("BA Fill - std", c, LinkedList::<u64>::new);

    bencher("BA Fill - pool", c, || DoublyLinkedList::<u64, _>::new(&allocator));
}

//  Batch Round-Trip.
//
//  This benchmark keeps a nearly full list, repeatedly pushing at the back and popping at the front.
//
//  The chunk freed at the front is the lowest free chunk, so the pool reuses it at once.
fn batch_round_trip(c: &mut Criterion) {
    fn bencher<L: Queue>(name: &'static str, c: &mut Criterion, mut list: L) {
        for i in 0..(NUMBER_ELEMENTS - 1) {
            list.push_back(i as u64);
        }

        c.bench_function(name, |b| b.iter(|| {
            list.push_back(black_box(42));
            black_box(list.pop_front())
        }));
    }

    let allocator = pool(NUMBER_ELEMENTS);

    bencher("BA Round-trip - std", c, LinkedList::<u64>::new());

    bencher("BA Round-trip - pool", c, DoublyLinkedList::<u64, _>::new(&allocator));
}

criterion_group!(
    batch,
    batch_fill,
    batch_round_trip
);

criterion_main!(
    single_element,
    batch
);

//
//  Implementation Details
//

trait Queue {
    fn push_back(&mut self, value: u64);

    fn pop_front(&mut self) -> Option<u64>;
}

impl Queue for LinkedList<u64> {
    fn push_back(&mut self, value: u64) { LinkedList::push_back(self, value) }

    fn pop_front(&mut self) -> Option<u64> { LinkedList::pop_front(self) }
}

impl<'a> Queue for DoublyLinkedList<'a, u64, ChunkAllocator<HeapPlatform>> {
    fn push_back(&mut self, value: u64) {
        DoublyLinkedList::push_back(self, value).expect("Chunk available");
    }

    fn pop_front(&mut self) -> Option<u64> { DoublyLinkedList::pop_front(self) }
}

fn pool(chunk_count: usize) -> ChunkAllocator {
    let configuration = Configuration::for_layout(chunkpool::node_layout::<u64>(), chunk_count)
        .expect("Valid configuration");

    ChunkAllocator::new(configuration).expect("Buffer allocated")
}
