use std::thread;

use segtree::{operation, PersistentSegtree};

#[test]
fn read_and_branch_from_many_threads() {
    let base = PersistentSegtree::from_iter_op(0..1000u64, operation::add());
    let total = base.all();
    let branches = thread::scope(|s| {
        let handles = (0..8u64)
            .map(|t| {
                let base = &base;
                s.spawn(move || {
                    let mut version = base.clone();
                    for i in 0..100 {
                        assert_eq!(base.query(..), total);
                        version = version.update(t as usize * 100 + i, 1).unwrap();
                    }
                    version
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });
    assert_eq!(base.all(), total);
    for (t, version) in branches.iter().enumerate() {
        assert_eq!(version.all(), total + 100);
        assert_eq!(version.query(t * 100..(t + 1) * 100), base.query(t * 100..(t + 1) * 100) + 100);
    }
}
