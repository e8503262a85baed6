//! Capacity bookkeeping as a scheduler drives it: fold task demands into an
//! envelope, check candidate machines, and track remaining capacity.

use sluice_resources::{Requirements, ResourceVector};

fn gib(n: f64) -> f64 {
    n * (1u64 << 30) as f64
}

#[test]
fn test_place_until_exhausted() {
    let machine: ResourceVector = "mem=16GiB,cpu=8,disk=100GiB".parse().expect("capacity");
    let task: ResourceVector = "mem=3GiB,cpu=2,disk=30GiB".parse().expect("demand");

    // Memory has the largest ratio: 16/3 rounds up to 6 slots.
    assert_eq!(machine.units(&task), 6);

    let mut remaining = machine;
    let mut placed = 0;
    while remaining.available(&task) {
        remaining = remaining - task;
        placed += 1;
    }
    // Slot units are an estimate; disk runs out after three placements.
    assert_eq!(placed, 3);
    assert_eq!(remaining, ResourceVector::new(gib(7.0), 2.0, gib(10.0)));
}

#[test]
fn test_envelope_picks_machine() {
    let demands = [
        "mem=2GiB,cpu=4".parse::<ResourceVector>().expect("demand"),
        "mem=8GiB,cpu=1".parse::<ResourceVector>().expect("demand"),
        "disk=50GiB".parse::<ResourceVector>().expect("demand"),
    ];
    let req = Requirements::fold(demands);
    assert_eq!(req.min, ResourceVector::new(gib(8.0), 4.0, gib(50.0)));

    let small: ResourceVector = "mem=8GiB,cpu=2,disk=100GiB".parse().expect("machine");
    let large: ResourceVector = "mem=32GiB,cpu=16,disk=100GiB".parse().expect("machine");
    assert!(!req.is_satisfied_by(&small));
    assert!(req.is_satisfied_by(&large));
}

#[test]
fn test_unbounded_pool_absorbs_releases() {
    let pool = ResourceVector::MAX;
    let released = ResourceVector::new(gib(4.0), 2.0, 0.0);
    assert_eq!(pool + released, ResourceVector::MAX);
    assert!(pool.available(&ResourceVector::MAX));
}
