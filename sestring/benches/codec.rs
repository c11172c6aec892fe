use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sestring::{MacroCode, RawEncodable, SeString, SeStringBuilder, expr::Expression};

fn build_dialogue(rng: &mut impl Rng, lines: usize) -> SeString {
    let mut builder = SeStringBuilder::new();
    for _ in 0..lines {
        builder
            .append_macro(MacroCode::Color, [Expression::int(rng.random())])
            .append_text("You obtain ")
            .append_macro(
                MacroCode::If,
                [
                    Expression::lnum(1).gt(1u32),
                    Expression::String(SeString::from(sestring::MacroPayload::new(
                        MacroCode::Kilo,
                        [Expression::lnum(1), Expression::text(",")],
                    ))),
                    Expression::text("a"),
                ],
            )
            .append_macro(
                MacroCode::EnNoun,
                [
                    Expression::text("Item"),
                    Expression::int(2),
                    Expression::int(rng.random_range(1..40_000)),
                    Expression::lnum(1),
                ],
            )
            .append_macro(MacroCode::Color, [Expression::stack_color()])
            .append_macro(MacroCode::NewLine, []);
    }
    builder.build()
}

fn bench_codec(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let short = build_dialogue(&mut rng, 1);
    let long = build_dialogue(&mut rng, 64);
    let short_bytes = short.encode_vec();
    let long_bytes = long.encode_vec();

    c.bench_function("encode_short", |b| b.iter(|| black_box(short.encode_vec())));
    c.bench_function("encode_long", |b| b.iter(|| black_box(long.encode_vec())));
    c.bench_function("decode_short", |b| {
        b.iter(|| black_box(SeString::decode(&short_bytes)))
    });
    c.bench_function("decode_long", |b| {
        b.iter(|| black_box(SeString::decode(&long_bytes)))
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
