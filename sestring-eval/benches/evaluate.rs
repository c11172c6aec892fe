use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use sestring::{MacroCode, MacroPayload, SeString, SeStringBuilder, expr::Expression};
use sestring_eval::{ClientLanguage, Evaluator, EvaluatorConfig, LocalParameter, Services, memory::InMemorySheets};

const ITEMS: u32 = 256;

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
                    Expression::String(SeString::from(MacroPayload::new(
                        MacroCode::Kilo,
                        [Expression::lnum(1), Expression::text(",")],
                    ))),
                    Expression::text("a"),
                ],
            )
            .append_text(" ")
            .append_macro(
                MacroCode::EnNoun,
                [
                    Expression::text("Item"),
                    Expression::int(2),
                    Expression::int(rng.random_range(1..ITEMS)),
                    Expression::lnum(1),
                ],
            )
            .append_macro(MacroCode::Color, [Expression::stack_color()])
            .append_macro(MacroCode::NewLine, []);
    }
    builder.build()
}

fn item_sheets() -> InMemorySheets {
    let mut sheets = InMemorySheets::new();
    for row in 1..ITEMS {
        sheets
            .insert("Item", row, 0, format!("item {row}").as_str())
            .insert("Item", row, 2, format!("items {row}").as_str())
            .insert("Item", row, 4, 0)
            .insert("Item", row, 7, 0);
    }
    sheets.insert_row("Attributive", 2, ["", "", "a ", "", "[n] ", "an ", "", "[n] "]);
    sheets
}

fn bench_evaluate(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::seed_from_u64(0x42);
    let short = build_dialogue(&mut rng, 1);
    let long = build_dialogue(&mut rng, 64);
    let sheets = item_sheets();
    let evaluator = Evaluator::new(EvaluatorConfig::default(), Services::unavailable().with_sheets(&sheets));
    let locals = [LocalParameter::Number(1_234)];

    c.bench_function("evaluate_short", |b| {
        b.iter(|| black_box(evaluator.evaluate_with(&short, ClientLanguage::English, locals.clone())))
    });
    c.bench_function("evaluate_long", |b| {
        b.iter(|| black_box(evaluator.evaluate_with(&long, ClientLanguage::English, locals.clone())))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
