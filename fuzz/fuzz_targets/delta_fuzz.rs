#![no_main]
use deltasig::{DeltaBuilder, DeltaSource, compute_delta, compute_signature_with_window_size};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }

    // First byte picks the window size, second the split point and the
    // streaming write size.
    let window = data[0] as usize % 64 + 1;
    let write_size = data[1] as usize % 32 + 1;
    let payload = &data[2..];
    let split = (data[1] as usize * payload.len()) / 256;
    let (basis, update) = payload.split_at(split);

    let sig = compute_signature_with_window_size(basis, window).unwrap();
    let entries = compute_delta(&sig, update);

    let mut rebuilt = Vec::with_capacity(update.len());
    for e in &entries {
        assert!(e.start < e.end);
        let range = e.start as usize..e.end as usize;
        match e.source {
            DeltaSource::Basis => rebuilt.extend_from_slice(&basis[range]),
            DeltaSource::Update => rebuilt.extend_from_slice(&update[range]),
        }
    }
    assert_eq!(rebuilt, update);

    let mut builder = DeltaBuilder::new(&sig);
    for part in update.chunks(write_size) {
        builder.update(part);
    }
    assert_eq!(builder.finish(), entries);
});
