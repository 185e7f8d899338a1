//! Wiki table rendering for items grouped by quality, and for sets

use crate::annotate::{ColorCodeStripper, DescriptionFormatter, LinkDictionary, WordWrapper};
use crate::config::RenderConfig;
use crate::error::Result;
use crate::export::ItemEntry;
use crate::sets::SetSummary;

/// Colors for one quality: text color and two alternating row backgrounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: &'static str,
    pub rows: [&'static str; 2],
}

impl Palette {
    /// Background for the row at `index`
    pub fn row_background(&self, index: usize) -> &'static str {
        self.rows[index % 2]
    }
}

const COMMON: Palette = Palette {
    text: "#9ca0a6",
    rows: ["#f7f7f8", "#ececee"],
};

const DEFAULT_PALETTE: Palette = Palette {
    text: "Black",
    rows: ["#ffffff", "#f2f2f2"],
};

/// Palette for a quality (case-insensitive), neutral for unknown ones
pub fn palette_for(quality: &str) -> Palette {
    match quality.trim().to_lowercase().as_str() {
        "common" => COMMON,
        "uncommon" => Palette {
            text: "#00dc00",
            rows: ["#f2fbf2", "#e3f5e3"],
        },
        "rare" => Palette {
            text: "#33ccff",
            rows: ["#f0faff", "#def3fc"],
        },
        "epic" => Palette {
            text: "#c975fc",
            rows: ["#f8f1fe", "#eee0fb"],
        },
        "cursed" => Palette {
            text: "Red",
            rows: ["#fdf0f0", "#f8dede"],
        },
        _ => DEFAULT_PALETTE,
    }
}

/// Group key used for items without a quality
pub const UNKNOWN_QUALITY: &str = "unknown";

const ITEM_HEADERS: &[&str] = &[
    "Icon",
    "Name",
    "Description",
    "Price",
    "Quality",
    "Set Item",
    "Item Set Name",
];

const SET_HEADERS: &[&str] = &["Item Set Name", "Items in Set", "Set Items", "Set Effect"];

/// Rendered markup for one quality group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityTable {
    pub quality: String,
    pub markup: String,
}

/// Group items by lower-cased quality, in order of first appearance
pub fn group_by_quality(items: &[ItemEntry]) -> Vec<(String, Vec<&ItemEntry>)> {
    let mut groups: Vec<(String, Vec<&ItemEntry>)> = Vec::new();
    for item in items {
        let key = item.quality.trim().to_lowercase();
        let key = if key.is_empty() {
            UNKNOWN_QUALITY.to_string()
        } else {
            key
        };

        match groups.iter_mut().find(|(quality, _)| *quality == key) {
            Some((_, members)) => members.push(item),
            None => groups.push((key, vec![item])),
        }
    }
    groups
}

/// Upper-case the first letter, lower-case the rest
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn format_boolean(value: bool) -> &'static str {
    if value {
        "✔"
    } else {
        "✘"
    }
}

fn header_row(out: &mut String, headers: &[&str]) {
    let cells: Vec<String> = headers.iter().map(|h| format!("'''{}'''", h)).collect();
    out.push_str(&format!("! {}\n", cells.join(" !! ")));
}

/// Renders item and set tables
#[derive(Debug, Clone)]
pub struct TableRenderer<'a> {
    formatter: DescriptionFormatter<'a>,
    config: &'a RenderConfig,
}

impl<'a> TableRenderer<'a> {
    /// Create a renderer; fails if the color marker yields a bad pattern
    pub fn new(dictionary: &'a LinkDictionary, config: &'a RenderConfig) -> Result<Self> {
        let formatter = DescriptionFormatter::new(
            dictionary,
            ColorCodeStripper::new(config.color_escape)?,
            WordWrapper::new(config.wrap_width, config.line_break.clone()),
        );
        Ok(Self { formatter, config })
    }

    /// Row anchor for an item name
    pub fn anchor(&self, name: &str) -> String {
        name.to_lowercase()
            .replace(' ', &self.config.anchor_separator.to_string())
    }

    /// Title of a quality table
    pub fn quality_title(&self, quality: &str) -> String {
        format!("List of {} {}", capitalize(quality), self.config.title_noun)
    }

    /// Artifact file name for a quality table
    ///
    /// Path separators and `..` in the quality are replaced so the file
    /// always lands directly in the output directory.
    pub fn quality_file_name(&self, quality: &str) -> String {
        let separator = self.config.anchor_separator.to_string();
        let quality = quality
            .replace(['/', '\\'], &separator)
            .replace("..", &separator);
        format!(
            "{}_{}_table.txt",
            quality,
            self.config.title_noun.to_lowercase().replace(' ', "_")
        )
    }

    /// Render one table per quality group
    pub fn render_quality_tables(&self, items: &[ItemEntry]) -> Vec<QualityTable> {
        group_by_quality(items)
            .into_iter()
            .map(|(quality, members)| QualityTable {
                markup: self.render_quality_table(&quality, &members),
                quality,
            })
            .collect()
    }

    /// Render the table for one quality
    pub fn render_quality_table(&self, quality: &str, items: &[&ItemEntry]) -> String {
        let palette = palette_for(quality);
        let mut out = String::new();

        out.push_str("{| class=\"wikitable\"\n");
        out.push_str(&format!(
            "! colspan=\"{}\" | {}\n",
            ITEM_HEADERS.len(),
            self.quality_title(quality)
        ));
        out.push_str("|-\n");
        header_row(&mut out, ITEM_HEADERS);

        for (index, item) in items.iter().enumerate() {
            out.push_str(&format!(
                "|- style=\"background-color:{};\"\n",
                palette.row_background(index)
            ));
            out.push_str(&format!(
                "| style=\"text-align:center;\" | {icon} || style=\"color:{color};\" | <span id=\"{anchor}\">{name}</span> || style=\"text-align:left;\" | {desc} || style=\"text-align:center;\" | {price} || style=\"text-align:center;\" | <span style=\"color:{color};\">{quality}</span> || style=\"text-align:center;\" | {member} || {set_name}\n",
                icon = item.icon,
                color = palette.text,
                anchor = self.anchor(&item.name),
                name = item.name,
                desc = self.formatter.format_description(&item.description),
                price = item.price,
                quality = capitalize(quality),
                member = format_boolean(item.is_set_member),
                set_name = item.set_name,
            ));
        }

        out.push_str("|}\n");
        out
    }

    /// Render the set table, resolving members against the item rows
    pub fn render_set_table(&self, sets: &[SetSummary], items: &[ItemEntry]) -> String {
        let palette = DEFAULT_PALETTE;
        let mut out = String::new();

        out.push_str("{| class=\"wikitable\"\n");
        out.push_str(&format!(
            "! colspan=\"{}\" | List of Item Sets\n",
            SET_HEADERS.len()
        ));
        out.push_str("|-\n");
        header_row(&mut out, SET_HEADERS);

        for (index, set) in sets.iter().enumerate() {
            let members: Vec<String> = set
                .members
                .iter()
                .map(|name| self.render_member(name, items))
                .collect();

            out.push_str(&format!(
                "|- style=\"background-color:{};\"\n",
                palette.row_background(index)
            ));
            out.push_str(&format!(
                "| <span id=\"{anchor}\">'''{name}'''</span> || style=\"text-align:center;\" | {count} || {members} ||\n{effects}\n",
                anchor = self.anchor(&set.name),
                name = set.name,
                count = set.member_count,
                members = members.join(self.formatter.line_break()),
                effects = self.render_effects(set),
            ));
        }

        out.push_str("|}\n");
        out
    }

    /// A set member: icon and colored link when the item is known
    fn render_member(&self, name: &str, items: &[ItemEntry]) -> String {
        match items.iter().find(|item| item.name == name) {
            Some(item) => {
                let palette = palette_for(&item.quality);
                let link = format!(
                    "<span style=\"color:{}\">[[{}#{}|{}]]</span>",
                    palette.text,
                    self.config.anchor_page,
                    self.anchor(name),
                    name
                );
                if item.icon.is_empty() {
                    link
                } else {
                    format!("{} {}", item.icon, link)
                }
            }
            None => format!("<span style=\"color:{}\">{}</span>", COMMON.text, name),
        }
    }

    /// Nested two-column threshold/description table
    fn render_effects(&self, set: &SetSummary) -> String {
        let effects = self.formatter.format_effects(&set.effect_pairs());
        if effects.is_empty() {
            return String::new();
        }

        let rows: Vec<String> = effects
            .iter()
            .map(|(threshold, description)| format!("| '''{}''' || {}", threshold, description))
            .collect();

        format!(
            "{{| class=\"wikitable\" style=\"margin:0;\"\n{}\n|}}",
            rows.join("\n|-\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, quality: &str, set_name: &str) -> ItemEntry {
        ItemEntry {
            id: name.to_lowercase().replace(' ', ""),
            name: name.to_string(),
            quality: quality.to_string(),
            price: "10".to_string(),
            description: "Base: +5 Armor".to_string(),
            icon: String::new(),
            is_set_member: !set_name.is_empty(),
            set_name: set_name.to_string(),
        }
    }

    #[test]
    fn test_group_by_quality_case_insensitive() {
        let items = vec![
            entry("Iron Ring", "Common", ""),
            entry("Ruby", "rare", ""),
            entry("Tin Ring", "common", ""),
            entry("Mystery", "", ""),
        ];

        let groups = group_by_quality(&items);

        let keys: Vec<&str> = groups.iter().map(|(q, _)| q.as_str()).collect();
        assert_eq!(keys, vec!["common", "rare", UNKNOWN_QUALITY]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn test_palette_fallback() {
        assert_eq!(palette_for("RARE").text, "#33ccff");
        assert_eq!(palette_for("mythic"), DEFAULT_PALETTE);
        assert_eq!(COMMON.row_background(0), "#f7f7f8");
        assert_eq!(COMMON.row_background(3), "#ececee");
    }

    #[test]
    fn test_anchor() {
        let dictionary = LinkDictionary::new();
        let config = RenderConfig::default();
        let renderer = TableRenderer::new(&dictionary, &config).unwrap();

        assert_eq!(renderer.anchor("Iron Ring of Power"), "iron_ring_of_power");
    }

    #[test]
    fn test_quality_file_name_stays_in_output_dir() {
        let dictionary = LinkDictionary::new();
        let config = RenderConfig::default();
        let renderer = TableRenderer::new(&dictionary, &config).unwrap();

        assert_eq!(renderer.quality_file_name("../x"), "__x_trinkets_table.txt");
        assert_eq!(renderer.quality_file_name("a/b"), "a_b_trinkets_table.txt");
        assert_eq!(renderer.quality_file_name("a\\b"), "a_b_trinkets_table.txt");
        assert_eq!(renderer.quality_file_name("epic"), "epic_trinkets_table.txt");
    }

    #[test]
    fn test_quality_table() {
        let dictionary = LinkDictionary::new();
        let config = RenderConfig::default();
        let renderer = TableRenderer::new(&dictionary, &config).unwrap();
        let items = vec![
            entry("Iron Ring", "common", "Iron Set"),
            entry("Tin Ring", "common", ""),
        ];

        let tables = renderer.render_quality_tables(&items);
        assert_eq!(tables.len(), 1);

        let markup = &tables[0].markup;
        assert!(markup.starts_with("{| class=\"wikitable\"\n! colspan=\"7\" | List of Common Trinkets\n"));
        assert!(markup.contains("<span id=\"iron_ring\">Iron Ring</span>"));
        assert!(markup.contains("|- style=\"background-color:#f7f7f8;\""));
        assert!(markup.contains("|- style=\"background-color:#ececee;\""));
        assert!(markup.contains("| ✔ || Iron Set\n"));
        assert!(markup.contains("| ✘ || \n"));
        assert!(markup.ends_with("|}\n"));
        assert_eq!(renderer.quality_file_name("common"), "common_trinkets_table.txt");
    }

    #[test]
    fn test_set_table_members_and_effects() {
        let mut dictionary = LinkDictionary::new();
        dictionary.insert("Armor", "Armor").unwrap();
        let config = RenderConfig::default();
        let renderer = TableRenderer::new(&dictionary, &config).unwrap();

        let mut ring = entry("Iron Ring", "rare", "Iron Set");
        ring.icon = "[[File:ironring.png]]".to_string();
        let items = vec![ring];
        let sets = vec![SetSummary {
            name: "Iron Set".to_string(),
            member_count: 2,
            members: vec!["Iron Ring".to_string(), "Unknown Item".to_string()],
            effects: vec!["2:+10 Armor".to_string(), "4:+20 Armor".to_string()],
        }];

        let markup = renderer.render_set_table(&sets, &items);

        assert!(markup.contains(
            "[[File:ironring.png]] <span style=\"color:#33ccff\">[[#iron_ring|Iron Ring]]</span>"
        ));
        assert!(markup.contains("<span style=\"color:#9ca0a6\">Unknown Item</span>"));
        assert!(markup.contains("| '''2''' || +10 [[Armor]]\n|-\n| '''4''' || +20 Armor\n|}"));
        assert!(markup.contains("<span id=\"iron_set\">'''Iron Set'''</span>"));
    }
}
