//! Export to the Cockatrice card database format (version 4).
//!
//! The document looks like this, indented by two spaces per level:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <cockatrice_carddatabase version="4">
//!   <sets>
//!     <set>
//!       <name>SBA</name>
//!       <longname>Sandbox Alpha</longname>
//!       <type>Custom</type>
//!       <releasedate>2024-05-01</releasedate>
//!     </set>
//!   </sets>
//!   <cards>
//!     <card>...</card>
//!   </cards>
//! </cockatrice_carddatabase>
//! ```

use crate::config::ExportOptions;
use crate::error::{CatalogError, Result};
use crate::model::{Card, PrimaryType};
use crate::rarity::Rarity;
use log::info;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const CATALOG_VERSION: &str = "4";
pub const SET_TYPE: &str = "Custom";
pub const LAYOUT: &str = "normal";
pub const SIDE: &str = "front";

/// Table row for a (lowercased) main type. Unknown types are an error.
pub fn table_row(maintype: &str) -> Result<u8> {
    Ok(maintype.parse::<PrimaryType>()?.table_row())
}

/// One `<card>` element, flattened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardRecord {
    pub name: String,
    pub text: String,
    pub layout: &'static str,
    pub side: &'static str,
    #[serde(rename = "type")]
    pub type_line: String,
    pub maintype: String,
    pub manacost: String,
    pub cmc: u64,
    pub colors: String,
    #[serde(rename = "coloridentity")]
    pub color_identity: String,
    pub pt: Option<String>,
    pub set: String,
    pub rarity: Rarity,
    pub tablerow: u8,
}

impl CardRecord {
    pub fn from_card(card: &Card, expand_rule_names: bool) -> Result<Self> {
        let maintype = card
            .primary_type()
            .ok_or_else(|| CatalogError::MissingType(card.name.clone()))?
            .to_lowercase();
        let tablerow = table_row(&maintype)?;

        let rules = if expand_rule_names {
            card.expand_rules()
        } else {
            card.rules.clone()
        };
        let colors: String = card.colors().map(|c| c.symbol()).collect();

        Ok(CardRecord {
            name: card.name.clone(),
            text: rules.join("\n"),
            layout: LAYOUT,
            side: SIDE,
            type_line: card
                .types
                .iter()
                .map(|t| t.to_lowercase())
                .collect::<Vec<_>>()
                .join(" "),
            maintype,
            manacost: card.cost.as_str(),
            cmc: card.cost.cmc(),
            color_identity: colors.clone(),
            colors,
            pt: card.power_toughness().map(|(p, t)| format!("{p}/{t}")),
            set: card.set_code.clone(),
            rarity: card.rarity,
            tablerow,
        })
    }
}

/// Project every card, failing on the first one that cannot be exported.
pub fn project_cards<'a, I>(cards: I, expand_rule_names: bool) -> Result<Vec<CardRecord>>
where
    I: IntoIterator<Item = &'a Card>,
{
    cards
        .into_iter()
        .map(|card| CardRecord::from_card(card, expand_rule_names))
        .collect()
}

/// Write a complete catalog document for `cards` to `out`.
pub fn write_catalog<'a, W, I>(out: W, cards: I, options: &ExportOptions) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Card>,
{
    let records = project_cards(cards, options.expand_rule_names)?;
    write_records(out, &records, options)
}

/// Write the catalog to a file at `path`. Nothing is created if any card
/// fails to project.
pub fn export_catalog<'a, I>(path: &Path, cards: I, options: &ExportOptions) -> Result<()>
where
    I: IntoIterator<Item = &'a Card>,
{
    let records = project_cards(cards, options.expand_rule_names)?;
    let mut out = BufWriter::new(File::create(path)?);
    write_records(&mut out, &records, options)?;
    out.flush()?;
    info!("wrote {} cards to {}", records.len(), path.display());
    Ok(())
}

pub fn write_records<W: Write>(
    out: W,
    records: &[CardRecord],
    options: &ExportOptions,
) -> Result<()> {
    let mut w = Writer::new_with_indent(out, b' ', 2);
    w.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    w.write_event(Event::Start(
        BytesStart::new("cockatrice_carddatabase").with_attributes([("version", CATALOG_VERSION)]),
    ))?;

    start(&mut w, "sets")?;
    start(&mut w, "set")?;
    text_element(&mut w, "name", &options.set_code)?;
    text_element(&mut w, "longname", &options.long_name)?;
    text_element(&mut w, "type", SET_TYPE)?;
    text_element(&mut w, "releasedate", &options.release_date)?;
    end(&mut w, "set")?;
    end(&mut w, "sets")?;

    start(&mut w, "cards")?;
    for record in records {
        write_card(&mut w, record)?;
    }
    end(&mut w, "cards")?;
    end(&mut w, "cockatrice_carddatabase")?;

    let mut out = w.into_inner();
    out.write_all(b"\n")?;
    Ok(())
}

fn write_card<W: Write>(w: &mut Writer<W>, record: &CardRecord) -> Result<()> {
    start(w, "card")?;
    text_element(w, "name", &record.name)?;
    text_element(w, "text", &record.text)?;

    start(w, "prop")?;
    text_element(w, "layout", record.layout)?;
    text_element(w, "side", record.side)?;
    text_element(w, "type", &record.type_line)?;
    text_element(w, "maintype", &record.maintype)?;
    text_element(w, "manacost", &record.manacost)?;
    text_element(w, "cmc", &record.cmc.to_string())?;
    text_element(w, "colors", &record.colors)?;
    text_element(w, "coloridentity", &record.color_identity)?;
    if let Some(pt) = &record.pt {
        text_element(w, "pt", pt)?;
    }
    end(w, "prop")?;

    w.write_event(Event::Start(
        BytesStart::new("set").with_attributes([("rarity", record.rarity.long_name())]),
    ))?;
    w.write_event(Event::Text(BytesText::new(&record.set)))?;
    end(w, "set")?;

    text_element(w, "tablerow", &record.tablerow.to_string())?;
    end(w, "card")
}

fn start<W: Write>(w: &mut Writer<W>, name: &str) -> Result<()> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn end<W: Write>(w: &mut Writer<W>, name: &str) -> Result<()> {
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Empty text is written as a self-closing element.
fn text_element<W: Write>(w: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        w.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    start(w, name)?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    end(w, name)
}
