#![no_main]
use firstfit_sim::{BlockList, ProcessId};
use libfuzzer_sys::{fuzz_target, arbitrary::{Arbitrary, Unstructured}};

#[derive(Debug, Arbitrary)]
enum Op {
    Request { process: u8, size: u16 },
    Release { process: u8 },
}

// Random request/release streams must never break the partition invariants
fuzz_target!(|input: &[u8]| {
    let mut u = Unstructured::new(input);

    let total: u16 = match u.arbitrary() {
        Ok(t) => t,
        Err(_) => return,
    };
    let ops: Vec<Op> = match u.arbitrary() {
        Ok(ops) => ops,
        Err(_) => return,
    };

    let mut list = match BlockList::new(u64::from(total)) {
        Ok(list) => list,
        Err(_) => return,
    };

    for op in ops.iter().take(256) {
        match op {
            Op::Request { process, size } => {
                let pid = ProcessId::new(format!("P{}", process % 16)).unwrap();
                let _ = list.allocate(&pid, u64::from(*size));
            }
            Op::Release { process } => {
                let _ = list.release(&format!("P{}", process % 16));
            }
        }

        if let Err(e) = list.check_invariants() {
            panic!("invariant violated after {:?}: {}", op, e);
        }
    }
});
