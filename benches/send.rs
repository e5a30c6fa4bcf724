use std::sync::Arc;

use criterion::*;
use rand::seq::SliceRandom;
use rtp_relay::prelude::*;

fn criterion_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    #[rustfmt::skip]
    let mut samples = vec![
        include_bytes!("../crates/codec/tests/samples/RtpAbsSendTime.bin").to_vec(),
        include_bytes!("../crates/codec/tests/samples/ChannelDataRtp.bin").to_vec(),
        include_bytes!("../crates/codec/tests/samples/SendIndicationRtp.bin").to_vec(),
    ];

    samples.shuffle(&mut rand::rng());

    let options = PacketOptions::default()
        .with_abs_send_time(3, None)
        .with_auth(vec![0x5a; 20], AUTH_TAG_LENGTH_80, 0);

    let mut send_criterion = c.benchmark_group("send");

    send_criterion.throughput(Throughput::Elements(1));
    send_criterion.bench_function("apply_packet_options", |bencher| {
        let mut index = 0;

        bencher.iter(|| {
            index = (index + 1) % samples.len();
            apply_packet_options(&mut samples[index], &options).unwrap();
        })
    });

    send_criterion.finish();

    let relay = RtpDumpRelay::new(runtime.handle().clone());
    relay.start_capture(true, true, Arc::new(|_, _, _, _| {}));

    let mut dump_criterion = c.benchmark_group("dump");

    dump_criterion.throughput(Throughput::Elements(1));
    dump_criterion.bench_function("record", |bencher| {
        let mut index = 0;

        bencher.iter(|| {
            index = (index + 1) % samples.len();
            relay.record(&samples[index], Direction::Outgoing);
        });

        // run the queued deliveries so they do not pile up between samples.
        runtime.block_on(tokio::task::yield_now());
    });

    dump_criterion.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
