//! Reading card rows out of CSV exports and spreadsheet ranges.
//!
//! Both sources share one column layout, starting with a header row:
//! rarity, legendary, type, subtypes, classes, power, toughness, cost, rules,
//! name, flavor, image. Columns past the image are ignored.

use crate::cost::Cost;
use crate::error::{CatalogError, Result};
use crate::model::{Card, Stat};
use crate::rarity::Rarity;
use indexmap::IndexMap;
use log::{debug, info, warn};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Set code used when scanning the working directory.
pub const DEFAULT_SET_CODE: &str = "SBA";

/// The only cell value that marks a card as legendary.
pub const LEGENDARY_TOKEN: &str = "TRUE";

const TYPE_LINE_SEPARATOR: &str = " - ";

const COL_RARITY: usize = 0;
const COL_LEGENDARY: usize = 1;
const COL_TYPE: usize = 2;
const COL_SUBTYPES: usize = 3;
const COL_CLASSES: usize = 4;
const COL_POWER: usize = 5;
const COL_TOUGHNESS: usize = 6;
const COL_COST: usize = 7;
const COL_RULES: usize = 8;
const COL_NAME: usize = 9;
const COL_FLAVOR: usize = 10;

/// Cards keyed by name, in the order their rows were first seen. A later
/// row with the same name replaces the card but keeps its position.
pub type CardMap = IndexMap<String, Card>;

/// How a source packs multi-valued cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    /// CSV files: one rule per line inside the cell.
    File,
    /// Spreadsheet cells: rules separated by semicolons. The power cell may
    /// also hold both stats as `"2/2"` with the toughness cell left empty.
    Sheet,
}

impl RowFormat {
    pub fn rule_delimiter(self) -> char {
        match self {
            RowFormat::File => '\n',
            RowFormat::Sheet => ';',
        }
    }
}

/// Something that can hand back a rectangular block of spreadsheet cells,
/// header row first. Trailing empty cells may be missing from a row.
pub trait RangeSource {
    fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>>;
}

/// Parse one data row. Returns `Ok(None)` for blank rows (no name).
pub fn parse_row<S: AsRef<str>>(
    row: &[S],
    set_code: &str,
    format: RowFormat,
) -> Result<Option<Card>> {
    let name = cell(row, COL_NAME);
    if name.is_empty() {
        return Ok(None);
    }

    let rarity = Rarity::from_code(cell(row, COL_RARITY))?;
    let (types, mut subtypes) = split_type_line(cell(row, COL_TYPE));
    subtypes.extend(tokens(cell(row, COL_SUBTYPES)));
    let cost: Cost = cell(row, COL_COST).parse()?;
    let (power, toughness) = split_stats(cell(row, COL_POWER), cell(row, COL_TOUGHNESS), format);

    Ok(Some(Card {
        set_code: set_code.to_string(),
        rarity,
        legendary: cell(row, COL_LEGENDARY) == LEGENDARY_TOKEN,
        types,
        subtypes,
        classes: tokens(cell(row, COL_CLASSES)),
        power,
        toughness,
        cost,
        rules: split_rules(cell(row, COL_RULES), format),
        name: name.to_string(),
        flavor: cell(row, COL_FLAVOR).to_string(),
    }))
}

/// Read a CSV export (header row first) into cards keyed by name.
pub fn parse_csv_reader<R: Read>(r: R, set_code: &str) -> Result<CardMap> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(r);

    let mut cards = CardMap::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);
        let row: Vec<&str> = record.iter().collect();
        insert_row(&mut cards, line, &row, set_code, RowFormat::File)?;
    }
    Ok(cards)
}

pub fn parse_csv_file(path: &Path, set_code: &str) -> Result<CardMap> {
    debug!("reading cards from {}", path.display());
    let f = File::open(path)?;
    let cards = parse_csv_reader(f, set_code)?;
    info!("read {} cards from {}", cards.len(), path.display());
    Ok(cards)
}

/// Ingest a spreadsheet grid whose first row is the header.
pub fn parse_sheet_rows<S: AsRef<str>>(grid: &[Vec<S>], set_code: &str) -> Result<CardMap> {
    let mut cards = CardMap::new();
    for (idx, row) in grid.iter().enumerate().skip(1) {
        insert_row(&mut cards, idx + 1, row, set_code, RowFormat::Sheet)?;
    }
    Ok(cards)
}

/// Read `range` from a spreadsheet and ingest it.
pub fn parse_sheet<S: RangeSource + ?Sized>(
    source: &S,
    range: &str,
    set_code: &str,
) -> Result<CardMap> {
    debug!("reading cards from sheet range {range}");
    let grid = source.read_range(range)?;
    let cards = parse_sheet_rows(&grid, set_code)?;
    info!("read {} cards from sheet range {range}", cards.len());
    Ok(cards)
}

/// Parse every `*.csv` file directly inside `dir`, in path order. Later files
/// win when two files define the same card name. `dir` must be valid UTF-8.
pub fn parse_csv_dir(dir: &Path, set_code: &str) -> Result<CardMap> {
    let dir_str = dir
        .to_str()
        .ok_or_else(|| CatalogError::NonUtf8Path(dir.to_path_buf()))?;
    let pattern = format!("{}/*.csv", glob::Pattern::escape(dir_str));
    let mut cards = CardMap::new();
    for entry in glob::glob(&pattern)? {
        let path = entry.map_err(|e| CatalogError::Io(e.into_error()))?;
        if !path.is_file() {
            continue;
        }
        merge_cards(&mut cards, parse_csv_file(&path, set_code)?);
    }
    Ok(cards)
}

/// All CSV card files in the working directory, tagged with the default set.
pub fn all_cards() -> Result<CardMap> {
    parse_csv_dir(Path::new("."), DEFAULT_SET_CODE)
}

/// Merge `other` into `cards`; entries from `other` replace same-named ones.
pub fn merge_cards(cards: &mut CardMap, other: CardMap) {
    for (name, card) in other {
        if let Some(previous) = cards.insert(name, card) {
            warn!(
                "card {:?} defined more than once, keeping the later one",
                previous.name
            );
        }
    }
}

fn insert_row<S: AsRef<str>>(
    cards: &mut CardMap,
    line: usize,
    row: &[S],
    set_code: &str,
    format: RowFormat,
) -> Result<()> {
    match parse_row(row, set_code, format).map_err(|e| e.at_line(line))? {
        Some(card) => {
            if let Some(previous) = cards.insert(card.name.clone(), card) {
                warn!(
                    "row {line}: card {:?} defined more than once, keeping the later one",
                    previous.name
                );
            }
        }
        None => debug!("row {line}: no name, skipping"),
    }
    Ok(())
}

fn cell<S: AsRef<str>>(row: &[S], idx: usize) -> &str {
    row.get(idx).map(|s| s.as_ref()).unwrap_or("")
}

fn tokens(cell: &str) -> Vec<String> {
    cell.split_whitespace().map(str::to_string).collect()
}

/// `"Creature - Goblin Shaman"` becomes `(["Creature"], ["Goblin", "Shaman"])`.
fn split_type_line(cell: &str) -> (Vec<String>, Vec<String>) {
    let (major, minors) = match cell.split_once(TYPE_LINE_SEPARATOR) {
        Some((major, minors)) => (major.trim(), tokens(minors)),
        None => (cell.trim(), Vec::new()),
    };
    let types = if major.is_empty() {
        Vec::new()
    } else {
        vec![major.to_string()]
    };
    (types, minors)
}

/// Rule lines are kept verbatim apart from a trailing `\r`. An empty cell
/// has no rules.
fn split_rules(cell: &str, format: RowFormat) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(format.rule_delimiter())
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

fn split_stats(power: &str, toughness: &str, format: RowFormat) -> (Option<Stat>, Option<Stat>) {
    match power.split_once('/') {
        Some((p, t)) if format == RowFormat::Sheet && toughness.is_empty() => {
            (Stat::parse(p.trim()), Stat::parse(t.trim()))
        }
        _ => (Stat::parse(power), Stat::parse(toughness)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::Color;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn goblin() -> Vec<String> {
        row(&[
            "U",
            "FALSE",
            "Creature",
            "Goblin Shaman",
            "Wizard",
            "2",
            "1",
            "1R",
            "Haste\n~ gets +1/+0 while attacking.",
            "Mogg Seer",
            "It sees fire.",
            "seer.png",
            "extra column",
        ])
    }

    #[test]
    fn parses_a_full_row() {
        let card = parse_row(&goblin(), "SBA", RowFormat::File)
            .unwrap()
            .unwrap();
        assert_eq!(card.name, "Mogg Seer");
        assert_eq!(card.set_code, "SBA");
        assert_eq!(card.rarity, Rarity::Uncommon);
        assert!(!card.legendary);
        assert_eq!(card.types, vec!["Creature"]);
        assert_eq!(card.subtypes, vec!["Goblin", "Shaman"]);
        assert_eq!(card.classes, vec!["Wizard"]);
        assert_eq!(card.power, Some(Stat::Number(2)));
        assert_eq!(card.toughness, Some(Stat::Number(1)));
        assert_eq!(card.cost.generic(), Some(1));
        assert_eq!(card.cost.count(Color::R), 1);
        assert_eq!(card.rules, vec!["Haste", "~ gets +1/+0 while attacking."]);
        assert_eq!(card.flavor, "It sees fire.");
    }

    #[test]
    fn blank_name_is_skipped() {
        let mut r = goblin();
        r[COL_NAME] = String::new();
        assert!(parse_row(&r, "SBA", RowFormat::File).unwrap().is_none());
        // nothing else is looked at, even garbage
        r[COL_COST] = "xyz".into();
        assert!(parse_row(&r, "SBA", RowFormat::File).unwrap().is_none());
    }

    #[test]
    fn legendary_only_for_exact_token() {
        let cases = [("TRUE", true), ("true", false), ("FALSE", false), ("", false)];
        for (value, expected) in cases {
            let mut r = goblin();
            r[COL_LEGENDARY] = value.into();
            let card = parse_row(&r, "SBA", RowFormat::File).unwrap().unwrap();
            assert_eq!(card.legendary, expected, "{value:?}");
        }
    }

    #[test]
    fn empty_lists_and_literal_stats() {
        let mut r = goblin();
        r[COL_SUBTYPES] = String::new();
        r[COL_CLASSES] = String::new();
        r[COL_POWER] = "*".into();
        r[COL_TOUGHNESS] = String::new();
        let card = parse_row(&r, "SBA", RowFormat::File).unwrap().unwrap();
        assert!(card.subtypes.is_empty());
        assert!(card.classes.is_empty());
        assert_eq!(card.power, Some(Stat::Literal("*".into())));
        assert_eq!(card.toughness, None);
    }

    #[test]
    fn type_line_is_split() {
        let mut r = goblin();
        r[COL_TYPE] = "Creature - Goblin".into();
        r[COL_SUBTYPES] = "Shaman".into();
        let card = parse_row(&r, "SBA", RowFormat::File).unwrap().unwrap();
        assert_eq!(card.types, vec!["Creature"]);
        assert_eq!(card.subtypes, vec!["Goblin", "Shaman"]);
    }

    #[test]
    fn sheet_rules_split_on_semicolons() {
        let mut r = goblin();
        r[COL_RULES] = "Haste;Trample".into();
        let sheet = parse_row(&r, "SBA", RowFormat::Sheet).unwrap().unwrap();
        assert_eq!(sheet.rules, vec!["Haste", "Trample"]);
        let file = parse_row(&r, "SBA", RowFormat::File).unwrap().unwrap();
        assert_eq!(file.rules, vec!["Haste;Trample"]);
    }

    #[test]
    fn rule_lines_are_kept_verbatim() {
        let mut r = goblin();
        r[COL_RULES] = "Flying\n\n  Reminder indented\r\nLast ".into();
        let card = parse_row(&r, "SBA", RowFormat::File).unwrap().unwrap();
        assert_eq!(card.rules, vec!["Flying", "", "  Reminder indented", "Last "]);

        r[COL_RULES] = "Haste; Trample;".into();
        let card = parse_row(&r, "SBA", RowFormat::Sheet).unwrap().unwrap();
        assert_eq!(card.rules, vec!["Haste", " Trample", ""]);
    }

    #[test]
    fn sheet_power_cell_may_hold_both_stats() {
        let mut r = goblin();
        r[COL_POWER] = "3/*".into();
        r[COL_TOUGHNESS] = String::new();
        let sheet = parse_row(&r, "SBA", RowFormat::Sheet).unwrap().unwrap();
        assert_eq!(sheet.power, Some(Stat::Number(3)));
        assert_eq!(sheet.toughness, Some(Stat::Literal("*".into())));

        // CSV files keep the cell as a literal power
        let file = parse_row(&r, "SBA", RowFormat::File).unwrap().unwrap();
        assert_eq!(file.power, Some(Stat::Literal("3/*".into())));
        assert_eq!(file.toughness, None);

        // a filled toughness cell wins over splitting
        r[COL_TOUGHNESS] = "4".into();
        let sheet = parse_row(&r, "SBA", RowFormat::Sheet).unwrap().unwrap();
        assert_eq!(sheet.power, Some(Stat::Literal("3/*".into())));
        assert_eq!(sheet.toughness, Some(Stat::Number(4)));
    }

    #[test]
    fn short_rows_read_as_empty_cells() {
        let r = row(&["C", "", "Sorcery", "", "", "", "", "B", "", "Lash"]);
        let card = parse_row(&r, "SBA", RowFormat::Sheet).unwrap().unwrap();
        assert_eq!(card.name, "Lash");
        assert!(card.rules.is_empty());
        assert_eq!(card.flavor, "");
    }

    #[test]
    fn bad_cost_and_rarity_are_format_errors() {
        let mut r = goblin();
        r[COL_COST] = "1r".into();
        assert!(matches!(
            parse_row(&r, "SBA", RowFormat::File),
            Err(CatalogError::InvalidCost(_))
        ));

        let mut r = goblin();
        r[COL_RARITY] = "S".into();
        assert!(matches!(
            parse_row(&r, "SBA", RowFormat::File),
            Err(CatalogError::UnknownRarity(_))
        ));
    }

    #[test]
    fn sheet_errors_carry_the_row_number() {
        let mut bad = goblin();
        bad[COL_COST] = "?".into();
        let grid = vec![row(&["header"]), goblin(), bad];
        let err = parse_sheet_rows(&grid, "SBA").unwrap_err();
        assert!(matches!(err, CatalogError::Row { line: 3, .. }));
        assert!(matches!(err.root(), CatalogError::InvalidCost(_)));
    }

    #[test]
    fn later_rows_overwrite_earlier_ones() {
        let mut second = goblin();
        second[COL_RARITY] = "R".into();
        let grid = vec![row(&["header"]), goblin(), second];
        let cards = parse_sheet_rows(&grid, "SBA").unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards["Mogg Seer"].rarity, Rarity::Rare);
    }

    #[test]
    fn cards_keep_row_order() {
        let mut zebra = goblin();
        zebra[COL_NAME] = "Zebra".into();
        let mut aardvark = goblin();
        aardvark[COL_NAME] = "Aardvark".into();
        let mut zebra_again = zebra.clone();
        zebra_again[COL_RARITY] = "M".into();
        let grid = vec![row(&["header"]), zebra, aardvark, zebra_again];

        let cards = parse_sheet_rows(&grid, "SBA").unwrap();
        let names: Vec<&str> = cards.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zebra", "Aardvark"]);
        assert_eq!(cards["Zebra"].rarity, Rarity::Mythic);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_directory_is_rejected() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = Path::new(OsStr::from_bytes(b"cards-\xff"));
        match parse_csv_dir(dir, "SBA") {
            Err(CatalogError::NonUtf8Path(p)) => assert_eq!(p, dir),
            other => panic!("expected NonUtf8Path, got {other:?}"),
        }
    }
}
