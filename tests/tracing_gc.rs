use proptest::prelude::*;
use snek::{ObjectSpace, Vm};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn lane_and_teej() {
    init_logger();
    let mut vm = Vm::new();

    let arr = vm.new_array(2).unwrap();
    let s1 = vm.new_string("Lane").unwrap();
    let s2 = vm.new_string("Teej").unwrap();
    assert!(vm.array_set(arr, 0, s1));
    assert!(vm.array_set(arr, 1, s2));
    vm.new_frame().unwrap().reference_object(arr).unwrap();

    vm.mark();
    vm.trace();
    assert_eq!(vm.is_marked(arr), Some(true));
    assert_eq!(vm.is_marked(s1), Some(true));
    assert_eq!(vm.is_marked(s2), Some(true));
    assert_eq!(vm.object_count(), 3);

    let frame = vm.frame_pop().unwrap();
    drop(frame);
    vm.collect_garbage();
    assert_eq!(vm.object_count(), 0);
}

#[test]
fn popped_root_is_collected() {
    let mut vm = Vm::new();
    let keep = vm.new_integer(0).unwrap();
    vm.new_frame().unwrap().reference_object(keep).unwrap();

    let s = vm.new_string("I wish I knew how to read.").unwrap();
    vm.new_frame().unwrap().reference_object(s).unwrap();
    vm.mark();
    vm.trace();
    assert_eq!(vm.is_marked(s), Some(true));

    vm.frame_pop();
    let before = vm.object_count();
    vm.collect_garbage();

    assert_eq!(vm.object_count(), before - 1);
    assert!(vm.object(s).is_none());
    assert!(vm.object(keep).is_some());
}

#[test]
fn shared_object_survives_until_both_frames_pop() {
    let mut vm = Vm::new();
    let shared = vm.new_float(3.5).unwrap();

    vm.new_frame().unwrap().reference_object(shared).unwrap();
    vm.new_frame().unwrap().reference_object(shared).unwrap();

    vm.frame_pop();
    vm.collect_garbage();
    assert!(vm.object(shared).is_some());

    vm.frame_pop();
    assert!(vm.object(shared).is_some());
    vm.collect_garbage();
    assert!(vm.object(shared).is_none());
    assert_eq!(vm.object_count(), 0);
}

#[test]
fn two_array_cycle() {
    let mut vm = Vm::new();
    let x = vm.new_array(1).unwrap();
    let y = vm.new_array(1).unwrap();
    vm.array_set(x, 0, y);
    vm.array_set(y, 0, x);
    vm.new_frame().unwrap().reference_object(x).unwrap();

    vm.mark();
    vm.trace();
    assert_eq!(vm.is_marked(x), Some(true));
    assert_eq!(vm.is_marked(y), Some(true));

    vm.frame_pop();
    let stats = vm.collect_garbage();
    assert_eq!(stats.freed, 2);
    assert_eq!(vm.object_count(), 0);
}

#[test]
fn nested_containers_survive_through_root() {
    let mut vm = Vm::new();

    let x = vm.new_integer(1).unwrap();
    let y = vm.new_integer(2).unwrap();
    let z = vm.new_integer(3).unwrap();
    let v = vm.new_vector3(x, y, z).unwrap();
    let inner = vm.new_array(1).unwrap();
    vm.array_set(inner, 0, v);
    let outer = vm.new_array(1).unwrap();
    vm.array_set(outer, 0, inner);
    let garbage = vm.new_string("unreferenced").unwrap();

    vm.new_frame().unwrap().reference_object(outer).unwrap();
    let stats = vm.collect_garbage();

    assert_eq!(stats.objects_before, 7);
    assert_eq!(stats.objects_after, 6);
    assert!(vm.object(garbage).is_none());
    for h in [x, y, z, v, inner, outer] {
        assert_eq!(vm.is_marked(h), Some(false));
    }
}

#[test]
fn add_results_are_ordinary_objects() {
    let mut vm = Vm::new();
    let a = vm.new_string("sn").unwrap();
    let b = vm.new_string("ek").unwrap();
    let joined = vm.add(a, b).unwrap();
    vm.new_frame().unwrap().reference_object(joined).unwrap();

    vm.collect_garbage();
    assert_eq!(vm.object_count(), 1);
    assert_eq!(vm.object(joined).unwrap().as_str(), Some("snek"));
}

proptest! {
    #[test]
    fn marking_twice_matches_marking_once(
        rooted in prop::collection::vec(any::<bool>(), 1..40),
    ) {
        let mut vm = Vm::new();
        let handles: Vec<_> = (0..rooted.len())
            .map(|i| vm.new_integer(i as i64).unwrap())
            .collect();

        let frame = vm.new_frame().unwrap();
        for (&h, &r) in handles.iter().zip(&rooted) {
            if r {
                frame.reference_object(h).unwrap();
            }
        }

        vm.mark();
        let once: Vec<_> = handles.iter().map(|&h| vm.is_marked(h)).collect();
        prop_assert_eq!(vm.mark(), 0);
        let twice: Vec<_> = handles.iter().map(|&h| vm.is_marked(h)).collect();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn collection_keeps_exactly_the_rooted(
        rooted in prop::collection::vec(any::<bool>(), 0..60),
    ) {
        let mut vm = Vm::new();
        let handles: Vec<_> = (0..rooted.len())
            .map(|i| vm.new_integer(i as i64).unwrap())
            .collect();

        let frame = vm.new_frame().unwrap();
        for (&h, &r) in handles.iter().zip(&rooted) {
            if r {
                frame.reference_object(h).unwrap();
            }
        }

        let stats = vm.collect_garbage();
        let kept = rooted.iter().filter(|&&r| r).count();
        prop_assert_eq!(stats.objects_after, kept);
        prop_assert_eq!(stats.freed, rooted.len() - kept);
        for (&h, &r) in handles.iter().zip(&rooted) {
            prop_assert_eq!(vm.object(h).is_some(), r);
        }

        vm.frame_pop();
        vm.collect_garbage();
        prop_assert_eq!(vm.object_count(), 0);
    }
}
