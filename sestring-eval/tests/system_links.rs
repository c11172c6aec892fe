use sestring::{FixedBody, MacroCode, MacroPayload, SeString, SeStringBuilder, expr::Expression};
use sestring_eval::{
    ClientLanguage, Evaluator, EvaluatorConfig, LocalParameter, Services,
    memory::{InMemorySheets, InMemoryTemplates},
};

fn fixed(body: FixedBody) -> SeString {
    SeString::from(MacroPayload::fixed(body))
}

/// `<name> (<x>, <y>)` with coordinates in tenths.
fn position_template() -> SeString {
    let float = |index| {
        [
            Expression::lnum(index),
            Expression::int(10),
            Expression::text("."),
        ]
    };
    let mut builder = SeStringBuilder::new();
    builder
        .append_macro(MacroCode::String, [Expression::lstr(1)])
        .append_text(" (")
        .append_macro(MacroCode::Float, float(2))
        .append_text(", ")
        .append_macro(MacroCode::Float, float(3))
        .append_text(")");
    builder.build()
}

fn templates() -> InMemoryTemplates {
    let ids = EvaluatorConfig::default().templates;
    let label = SeString::from(MacroPayload::new(MacroCode::String, [Expression::lstr(1)]));

    let mut player = SeStringBuilder::new();
    player
        .append_macro(MacroCode::String, [Expression::lstr(1)])
        .append_text("@")
        .append_macro(MacroCode::Num, [Expression::lnum(2)]);

    let mut remaining = SeStringBuilder::new();
    remaining
        .append_macro(MacroCode::Num, [Expression::lnum(1)])
        .append_text(":")
        .append_macro(MacroCode::Sec, [Expression::lnum(2)]);

    let mut class_job = SeStringBuilder::new();
    class_job
        .append_macro(MacroCode::String, [Expression::lstr(1)])
        .append_text(" Lv. ")
        .append_macro(MacroCode::Num, [Expression::lnum(2)]);

    let mut sound = SeStringBuilder::new();
    sound
        .append_text("Sound ")
        .append_macro(MacroCode::Num, [Expression::lnum(1)]);

    let mut listing = SeStringBuilder::new();
    listing
        .append_text("Listing ")
        .append_macro(MacroCode::Num, [Expression::lnum(1)])
        .append_text(" @")
        .append_macro(MacroCode::Num, [Expression::lnum(2)]);

    let mut templates = InMemoryTemplates::new();
    templates
        .insert(ids.player, player.build())
        .insert(ids.class_job_level, class_job.build())
        .insert(ids.chat_sound, sound.build())
        .insert(ids.object_name, label.clone())
        .insert(ids.status, label.clone())
        .insert(ids.party_finder, listing.build())
        .insert(ids.item, label.clone())
        .insert(ids.quest, label.clone())
        .insert(ids.literal_text, label.clone())
        .insert(ids.auto_translate, label)
        .insert(ids.time_remaining, remaining.build())
        .insert(ids.map_position, position_template())
        .insert(ids.level_position, position_template());
    templates
}

fn sheets() -> InMemorySheets {
    let mut sheets = InMemorySheets::new();
    sheets
        .insert("Item", 5, 0, "Potion")
        .insert("Item", 5, 1, 1)
        .insert("Item", 7, 0, "Relic")
        .insert("Item", 7, 1, 0x8000_0001u32)
        .insert("ClassJob", 19, 0, "Paladin")
        .insert("EObjName", 2000, 0, "Aetheryte")
        .insert("Status", 49, 0, "Medicated")
        .insert("Quest", 65964, 0, "The Ultimate Weapon")
        .insert_row("Map", 2, [10, 100, 0, 0])
        .insert("PlaceName", 10, 0, "Limsa Lominsa")
        .insert_row("Level", 9, [100.0f32, 5.0, -50.0])
        .insert("Level", 9, 3, 2)
        .insert_row("Completion", 51, ["", "", "Hello!"])
        .insert("Completion", 51, 0, 3)
        .insert_row("Completion", 52, ["", "Action[@row]"])
        .insert("Completion", 52, 0, 3)
        .insert("Action", 52, 0, "Cure");
    sheets
}

fn run(source: &SeString) -> SeString {
    let sheets = sheets();
    let templates = templates();
    let services = Services::unavailable().with_sheets(&sheets).with_templates(&templates);
    let evaluator = Evaluator::new(EvaluatorConfig::default(), services);
    evaluator.evaluate_with(source, ClientLanguage::English, [])
}

#[test]
fn high_quality_item_link() {
    let output = run(&fixed(FixedBody::literals(&[100, 4, 1_000_005])));
    assert_eq!(
        output.to_string(),
        "<link(2,1000005,1,0,0,Potion)><colortype(549)><edgecolortype(550)>\u{E0BB}Potion \u{E03C}\
         <edgecolortype(0)><colortype(0)><link(206)>"
    );
    assert_eq!(output.extract_text(), "\u{E0BB}Potion \u{E03C}");
}

#[test]
fn normal_quality_item_link() {
    let output = run(&fixed(FixedBody::literals(&[100, 4, 5])));
    assert_eq!(output.extract_text(), "\u{E0BB}Potion");
}

#[test]
fn item_rarity_out_of_range_saturates() {
    let output = run(&fixed(FixedBody::literals(&[100, 4, 7])));
    assert_eq!(
        output.to_string(),
        "<link(2,7,2147483649,0,0,Relic)><colortype(4294967295)><edgecolortype(4294967295)>\u{E0BB}Relic\
         <edgecolortype(0)><colortype(0)><link(206)>"
    );
}

#[test]
fn class_job_level_link() {
    let output = run(&fixed(FixedBody::literals(&[100, 2, 19, 50])));
    assert_eq!(
        output.to_string(),
        "<colortype(500)><edgecolortype(501)>\u{E0BB}Paladin Lv. 50<edgecolortype(0)><colortype(0)>"
    );
    assert_eq!(output.extract_text(), "\u{E0BB}Paladin Lv. 50");
}

#[test]
fn chat_sound_link() {
    let output = run(&fixed(FixedBody::literals(&[100, 5, 7])));
    assert_eq!(output.extract_text(), "\u{E0BB}Sound 7");
    assert!(!output.to_string().contains("<link("), "chat sounds are not hyperlinks: {output}");
}

#[test]
fn object_name_link() {
    let output = run(&fixed(FixedBody::literals(&[100, 6, 2000])));
    assert_eq!(
        output.to_string(),
        "<colortype(500)><edgecolortype(501)>\u{E0BB}Aetheryte<edgecolortype(0)><colortype(0)>"
    );
}

#[test]
fn status_link() {
    let output = run(&fixed(FixedBody::literals(&[100, 9, 49])));
    assert_eq!(
        output.to_string(),
        "<link(8,49,0)><colortype(500)><edgecolortype(501)>\u{E0BB}Medicated\
         <edgecolortype(0)><colortype(0)><link(206)>"
    );
}

#[test]
fn party_finder_link() {
    let output = run(&fixed(FixedBody::literals(&[100, 10, 1234, 73])));
    assert!(
        output.to_string().starts_with("<link(9,1234,0,73)>"),
        "party finder links open a listing hyperlink: {output}"
    );
    assert!(output.to_string().ends_with("<link(206)>"));
    assert_eq!(output.extract_text(), "\u{E0BB}Listing 1234 @73");
}

#[test]
fn quest_link() {
    let output = run(&fixed(FixedBody::literals(&[200, 11, 65964])));
    assert_eq!(
        output.to_string(),
        "<link(4,65964)><colortype(500)><edgecolortype(501)>\u{E0BB}The Ultimate Weapon\
         <edgecolortype(0)><colortype(0)><link(206)>"
    );
}

#[test]
fn player_link_uses_raw_name() {
    let output = run(&fixed(FixedBody::player(100, 73, b"Alphinaud Leveilleur", vec![])));
    assert_eq!(output.extract_text(), "\u{E0BB}Alphinaud Leveilleur@73");
    assert!(
        output.to_string().starts_with("<link(0,0,73,0,Alphinaud Leveilleur)>"),
        "player links open a character hyperlink: {output}"
    );
}

#[test]
fn literal_text_has_no_hyperlink() {
    let output = run(&fixed(FixedBody::literal_text(100, b"Hello", vec![])));
    assert_eq!(
        output.to_string(),
        "<colortype(500)><edgecolortype(501)>\u{E0BB}Hello<edgecolortype(0)><colortype(0)>"
    );
}

#[test]
fn time_remaining_splits_minutes() {
    let output = run(&fixed(FixedBody::literals(&[100, 8, 125])));
    assert_eq!(output.extract_text(), "\u{E0BB}2:05");
}

#[test]
fn map_position_link() {
    let output = run(&fixed(FixedBody::literals(&[100, 3, 132, 2, 0, 0])));
    assert_eq!(output.extract_text(), "\u{E0BB}Limsa Lominsa (21.4, 21.4)");
    assert!(output.to_string().starts_with("<link(3,8650754,0,0)>"));
}

#[test]
fn level_position() {
    let source = SeString::from(MacroPayload::new(MacroCode::LevelPos, [Expression::int(9)]));
    assert_eq!(run(&source).extract_text(), "Limsa Lominsa (23.4, 20.4)");
}

#[test]
fn auto_translate_phrases() {
    let inline = run(&fixed(FixedBody::literals(&[3, 51])));
    assert_eq!(inline.extract_text(), "\u{E040} Hello! \u{E041}");

    let looked_up = run(&fixed(FixedBody::literals(&[3, 52])));
    assert_eq!(looked_up.extract_text(), "\u{E040} Cure \u{E041}");

    let linked = run(&fixed(FixedBody::literals(&[100, 12, 3, 52])));
    assert_eq!(linked.extract_text(), "\u{E0BB}Cure");
}

#[test]
fn unresolvable_links_are_kept() {
    for source in [
        // Entry 51 is not in group 4.
        fixed(FixedBody::literals(&[4, 51])),
        // Unknown system link key.
        fixed(FixedBody::literals(&[100, 99])),
        // Missing status row.
        fixed(FixedBody::literals(&[100, 9, 1])),
        // Missing class/job row.
        fixed(FixedBody::literals(&[100, 2, 1, 50])),
        // Party finder link without its world.
        fixed(FixedBody::literals(&[100, 10, 1234])),
        // Missing item row.
        fixed(FixedBody::literals(&[100, 4, 6])),
    ] {
        assert_eq!(run(&source), source, "{source} should pass through");
    }
}

#[test]
fn system_message_arguments() {
    let sheets = sheets();
    let templates = templates();
    let services = Services::unavailable().with_sheets(&sheets).with_templates(&templates);
    let evaluator = Evaluator::new(EvaluatorConfig::default(), services);
    let mut ctx = evaluator.context();
    let id = evaluator.config().templates.player;
    let message = evaluator
        .format_system_message(id, vec!["Tataru".into(), LocalParameter::Number(40)], &mut ctx)
        .expect("template is registered");
    assert_eq!(message.extract_text(), "Tataru@40");
    assert!(evaluator.format_system_message(1, vec![], &mut ctx).is_err());
}
