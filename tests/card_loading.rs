//! Card loading tests
//!
//! Loads the JSON set files under `tests/fixtures/` and checks the cards,
//! printings and deck lists built from them.
//!
//! One round-trip test is generated per set file by `dir-test`; just add a
//! `.json` file to `tests/fixtures/sets/`.

use dir_test::{dir_test, Fixture};
use mtg_cards::core::{CardLookup, CardType, Color, ColorSet, FaceBuilder, ManaCost, Rarity, Supertype};
use mtg_cards::link::{Layout, WholeBuilder};
use mtg_cards::loader::{CardDatabase, CardFilter, DeckLoader, LoadOptions, SetFile};
use mtg_cards::{CardError, Result};
use similar_asserts::assert_eq;
use std::path::{Path, PathBuf};

fn fixtures(dir: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(dir)
}

fn sets_db() -> Result<CardDatabase> {
    CardDatabase::load_dir(&fixtures("sets"), &LoadOptions::strict())
}

/// Every set fixture loads strictly and serializes back to equal cards
#[dir_test(
    dir: "$CARGO_MANIFEST_DIR/tests/fixtures/sets",
    glob: "**/*.json",
)]
fn test_set_file_round_trip(fixture: Fixture<&str>) {
    let set = SetFile::parse(fixture.content()).unwrap();
    let code = set.code().to_string();
    let db = CardDatabase::from_set_files(vec![set], &LoadOptions::strict()).unwrap();
    assert_eq!(db.skipped(), 0, "{}", fixture.path());
    assert!(!db.is_empty());

    for card in db.cards() {
        let json = serde_json::to_string(&**card).unwrap();
        let builder: WholeBuilder<FaceBuilder> = serde_json::from_str(&json).unwrap();
        let rebuilt = builder.build().unwrap();
        assert_eq!(*rebuilt, **card, "{}", card.name());

        for printing in db.printings_of(&card.name()) {
            assert_eq!(printing.expansion().code(), code);
            assert_eq!(printing.faces().len(), card.len());
            assert_eq!(printing.faces().layout(), card.layout());
        }
    }
}

#[test]
fn test_load_fixture_directory() -> Result<()> {
    let db = sets_db()?;
    assert_eq!(db.len(), 7);
    assert_eq!(db.skipped(), 0);

    let codes: Vec<_> = db.expansions().map(|e| e.code().to_string()).collect();
    assert_eq!(codes, vec!["APC", "CHK", "ISD"]);

    let angel = db.card_by_name("lightning angel").unwrap();
    assert_eq!(
        angel.colors(),
        [Color::White, Color::Blue, Color::Red].into_iter().collect::<ColorSet>()
    );
    assert_eq!(angel.converted(), 4);
    Ok(())
}

#[test]
fn test_flip_card_from_set_file() -> Result<()> {
    let db = sets_db()?;
    let card = db.get_card("Tok-Tok, Volcano Born").unwrap();
    assert_eq!(card.layout(), Some(Layout::Flip));
    assert_eq!(card.name(), "Akki Lavarunner");

    let flipped = card.pair()?.second();
    assert!(flipped.own_mana_cost().is_none());
    assert_eq!(flipped.mana_cost(), ManaCost::parse("{3}{R}")?);
    assert_eq!(flipped.colors(), ColorSet::of(Color::Red));
    assert!(flipped.is_type(CardType::Creature));
    Ok(())
}

#[test]
fn test_double_faced_card_from_set_file() -> Result<()> {
    let db = sets_db()?;
    let card = db.get_card("Delver of Secrets").unwrap();
    let back = card.pair()?.second();
    assert!(back.mana_cost().is_empty());
    assert_eq!(back.colors(), ColorSet::of(Color::Blue));
    assert!(card.only().is_err());
    Ok(())
}

#[test]
fn test_printings_from_set_file() -> Result<()> {
    let db = sets_db()?;
    let printings = db.printings_of("ice");
    assert_eq!(printings.len(), 1);
    let fire_ice = &printings[0];
    assert_eq!(fire_ice.rarity(), Rarity::Uncommon);
    assert_eq!(fire_ice.to_string(), "Fire // Ice (APC U #128a)");

    let numbers: Vec<_> = fire_ice
        .face_pairs()
        .map(|(face, printed)| format!("{} {}", face.name(), printed.collector_number()))
        .collect();
    assert_eq!(numbers, vec!["Fire 128a", "Ice 128b"]);

    let garruk = &db.printings_of("Garruk Relentless")[0];
    assert_eq!(garruk.rarity(), Rarity::Mythic);
    assert_eq!(garruk.faces().only()?.artist(), "Eric Deschamps");
    Ok(())
}

fn filtered(db: &CardDatabase, filter: &CardFilter) -> Vec<String> {
    db.filter(filter).map(|card| card.name()).collect()
}

#[test]
fn test_filter_fixture_cards() -> Result<()> {
    let db = sets_db()?;
    let legendary = CardFilter {
        supertype: Some("Legendary".parse::<Supertype>()?),
        ..CardFilter::default()
    };
    assert_eq!(filtered(&db, &legendary), vec!["Akki Lavarunner", "Garruk Relentless"]);

    let rare_creatures = CardFilter {
        card_type: Some("Creature".parse::<CardType>()?),
        rarity: Some("R".parse::<Rarity>()?),
        ..CardFilter::default()
    };
    assert_eq!(filtered(&db, &rare_creatures), vec!["Lightning Angel", "Akki Lavarunner"]);

    let colorless = CardFilter {
        colors: Some(ColorSet::EMPTY),
        ..CardFilter::default()
    };
    assert_eq!(filtered(&db, &colorless), vec!["Island"]);

    let green = CardFilter {
        colors: Some("G".parse::<ColorSet>()?),
        ..CardFilter::default()
    };
    assert_eq!(filtered(&db, &green), vec!["Garruk Relentless"]);
    assert_eq!(db.filter(&CardFilter::default()).count(), 7);
    Ok(())
}

#[test]
fn test_diacritics_in_fixture_names() -> Result<()> {
    let db = sets_db()?;
    assert!(db.contains("Jotun Grunt"));
    assert!(db.contains("JÖTUN GRUNT"));
    Ok(())
}

#[test]
fn test_render_split_card() -> Result<()> {
    let db = sets_db()?;
    let card = db.get_card("Fire // Ice").unwrap();
    let expected = "\
Fire {1}{R}
Instant
Fire deals 2 damage divided as you choose among one or two targets.
//
Ice {1}{U}
Instant
Tap target permanent.
Draw a card.";
    assert_eq!(card.to_string(), expected);
    Ok(())
}

#[test]
fn test_render_flip_card() -> Result<()> {
    let db = sets_db()?;
    let card = db.get_card("Akki Lavarunner").unwrap();
    let expected = "\
Akki Lavarunner {3}{R}
Creature \u{2014} Goblin Warrior
Haste
1/1
//
Tok-Tok, Volcano Born {3}{R}
Legendary Creature \u{2014} Goblin Shaman
Protection from red
2/2";
    assert_eq!(card.to_string(), expected);
    Ok(())
}

#[test]
fn test_render_double_faced_and_planeswalker() -> Result<()> {
    let db = sets_db()?;
    let delver = db.get_card("Insectile Aberration").unwrap();
    let expected = "\
Delver of Secrets {U}
Creature \u{2014} Human Wizard
At the beginning of your upkeep, transform Delver of Secrets.
1/1
//
Insectile Aberration
(U)
Creature \u{2014} Human Insect
Flying
3/2";
    assert_eq!(delver.to_string(), expected);

    let garruk = db.get_card("Garruk Relentless").unwrap();
    let expected = "\
Garruk Relentless {3}{G}
Legendary Planeswalker \u{2014} Garruk
0: Create a 2/2 green Wolf creature token.
Loyalty: 3";
    assert_eq!(garruk.to_string(), expected);

    let island = db.get_card("Island").unwrap();
    assert_eq!(island.to_string(), "Island\nBasic Land \u{2014} Island");
    Ok(())
}

#[test]
fn test_lenient_load_skips_broken_records() -> Result<()> {
    let db = CardDatabase::load_dir(&fixtures("broken"), &LoadOptions::default())?;
    assert_eq!(db.len(), 1);
    assert!(db.contains("Llanowar Elves"));
    // Unreadable file, two bad cards and a printing with collector number 0
    assert_eq!(db.skipped(), 4);
    assert!(db.printings_of("Llanowar Elves").is_empty());
    Ok(())
}

#[test]
fn test_strict_load_rejects_broken_records() {
    let result = CardDatabase::load_dir(&fixtures("broken"), &LoadOptions::strict());
    assert!(matches!(result, Err(CardError::InvalidCardFormat(_))));
}

#[test]
fn test_load_file_adds_to_database() -> Result<()> {
    let mut db = CardDatabase::new();
    db.load_file(&fixtures("sets").join("apocalypse.json"), &LoadOptions::strict())?;
    assert_eq!(db.len(), 2);
    db.load_file(&fixtures("sets").join("innistrad.json"), &LoadOptions::strict())?;
    assert_eq!(db.len(), 5);
    assert!(db.expansion_by_code("isd").is_some());
    Ok(())
}

#[test]
fn test_strict_load_file_is_all_or_nothing() -> Result<()> {
    let mut db = sets_db()?;
    let codes: Vec<_> = db.expansions().map(|e| e.code().to_string()).collect();

    let result = db.load_file(&fixtures("broken").join("partial.json"), &LoadOptions::strict());
    assert!(matches!(result, Err(CardError::InvalidCardFormat(_))));
    assert_eq!(db.len(), 7);
    assert!(!db.contains("Llanowar Elves"));
    assert_eq!(
        db.expansions().map(|e| e.code().to_string()).collect::<Vec<_>>(),
        codes
    );
    assert_eq!(db.skipped(), 0);
    Ok(())
}

#[test]
fn test_resolve_deck_fixture() -> Result<()> {
    let db = sets_db()?;
    let deck = DeckLoader::load_from_file(&fixtures("decks").join("izzet.dck"))?;
    assert_eq!(deck.total_cards(), 20);
    assert_eq!(deck.sideboard_size(), 2);

    let resolved = deck.resolve(&db)?;
    assert_eq!(
        resolved.colors(),
        [Color::White, Color::Blue, Color::Red].into_iter().collect::<ColorSet>()
    );
    assert_eq!(resolved.count_color(Color::Blue), 10);
    assert!((resolved.average_converted() - 2.8).abs() < 1e-9);
    assert_eq!(resolved.sideboard[0].0.name(), "Fire // Ice");
    Ok(())
}
