use shared_registries::{Error, SharedRegistries};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

const THREADS: usize = 16;

#[test]
fn concurrent_get_or_create_constructs_once() {
    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);

    struct CountingRegistry;

    impl Default for CountingRegistry {
        fn default() -> Self {
            CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
            CountingRegistry
        }
    }

    let registries = SharedRegistries::<CountingRegistry>::new();
    let barrier = Barrier::new(THREADS);

    let handles = thread::scope(|s| {
        let workers: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    registries.get_or_create("x")
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap())
            .collect::<Vec<_>>()
    });

    let first = &handles[0];
    assert!(handles.iter().all(|handle| Arc::ptr_eq(first, handle)));
    assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
}

#[test]
fn concurrent_creation_of_distinct_names_binds_them_all() {
    #[derive(Default)]
    struct TestRegistry;

    let registries = SharedRegistries::<TestRegistry>::new();
    let barrier = Barrier::new(THREADS);

    thread::scope(|s| {
        for i in 0..THREADS {
            let name = format!("registry-{i}");
            let registries = &registries;
            let barrier = &barrier;
            s.spawn(move || {
                barrier.wait();
                registries.get_or_create(&name);
            });
        }
    });

    assert_eq!(registries.names().len(), THREADS);
}

#[test]
fn concurrent_set_default_has_a_single_winner() {
    #[derive(Default)]
    struct TestRegistry;

    let registries = SharedRegistries::<TestRegistry>::new();
    let barrier = Barrier::new(THREADS);

    let results = thread::scope(|s| {
        let workers: Vec<_> = (0..THREADS)
            .map(|i| {
                let name = format!("registry-{i}");
                let registries = &registries;
                let barrier = &barrier;
                s.spawn(move || {
                    barrier.wait();
                    registries.set_default(&name)
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|result| result.as_ref().err())
        .all(|err| *err == Error::DefaultAlreadySet));

    // The winner's binding is what the default resolves to
    let winner = results.into_iter().flatten().next().unwrap();
    assert!(Arc::ptr_eq(&registries.get_default().unwrap(), &winner));
}
