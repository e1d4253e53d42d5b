//! `.ccx` levelset metadata.
//!
//! A CCX file is an XML sidecar of a levelset, holding authorship, ruleset compatibility and
//! prologue/epilogue story pages of every level:
//! ```xml
//! <levelset author="Someone" ms="yes" color="white">
//!   <level number="1" lynx="no">
//!     <prologue><page>Welcome!</page></prologue>
//!   </level>
//!   <style>p { margin: 0 }</style>
//! </levelset>
//! ```
//!
//! Levels inherit the author and compatibility of the levelset, and pages inherit its page
//! properties. Only reading is supported.

use cctools_utils::{AnyResult, AnyhowResultExt};
use log::{debug, warn};
use roxmltree::{Document, Node};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CcxError {
    #[error("expected a `levelset` root element, found `{0}`")]
    NotLevelset(String),
}

/// Whether a levelset or level is known to be playable under a ruleset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compatibility {
    #[default]
    Unknown,
    Yes,
    No,
}

impl Compatibility {
    fn parse(value: &str) -> Self {
        match value {
            "yes" => Self::Yes,
            "no" => Self::No,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RulesetCompatibility {
    pub ms: Compatibility,
    pub lynx: Compatibility,
    pub pedantic: Compatibility,
}

impl RulesetCompatibility {
    fn read_attributes(&mut self, node: Node) {
        for (name, target) in [
            ("ms", &mut self.ms),
            ("lynx", &mut self.lynx),
            ("pedantic", &mut self.pedantic),
        ] {
            if let Some(value) = node.attribute(name) {
                *target = Compatibility::parse(value);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Presentation of a story page. Colors are kept as written, in any form understood by the
/// displaying side (`white`, `#RRGGBB`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageProperties {
    pub format: TextFormat,
    pub align: HorizontalAlign,
    pub valign: VerticalAlign,
    pub color: String,
    pub bgcolor: String,
}

impl Default for PageProperties {
    fn default() -> Self {
        Self {
            format: TextFormat::default(),
            align: HorizontalAlign::default(),
            valign: VerticalAlign::default(),
            color: "white".into(),
            bgcolor: "black".into(),
        }
    }
}

impl PageProperties {
    /// Unrecognized values fall back to the defaults, not to the inherited values.
    fn read_attributes(&mut self, node: Node) {
        if let Some(value) = node.attribute("format") {
            self.format = match value {
                "html" => TextFormat::Html,
                _ => TextFormat::Plain,
            };
        }
        if let Some(value) = node.attribute("align") {
            self.align = match value {
                "right" => HorizontalAlign::Right,
                "center" => HorizontalAlign::Center,
                _ => HorizontalAlign::Left,
            };
        }
        if let Some(value) = node.attribute("valign") {
            self.valign = match value {
                "bottom" => VerticalAlign::Bottom,
                "middle" => VerticalAlign::Middle,
                _ => VerticalAlign::Top,
            };
        }
        if let Some(value) = node.attribute("color") {
            self.color = value.to_string();
        }
        if let Some(value) = node.attribute("bgcolor") {
            self.bgcolor = value.to_string();
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub text: String,
    pub properties: PageProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CcxLevel {
    pub author: String,
    pub compatibility: RulesetCompatibility,
    pub prologue: Vec<Page>,
    pub epilogue: Vec<Page>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CcxLevelset {
    pub description: String,
    pub copyright: String,
    pub author: String,
    pub compatibility: RulesetCompatibility,
    pub page_properties: PageProperties,
    /// Metadata of every level of the levelset, in order.
    pub levels: Vec<CcxLevel>,
    pub style_sheet: String,
}

/// Concatenated text of all descendants, CDATA included.
fn text_of(node: Node) -> String {
    node.descendants()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect()
}

fn find_descendant<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .find(|child| child.has_tag_name(name))
}

impl CcxLevelset {
    /// Parses CCX metadata of a levelset holding `level_count` levels.
    pub fn parse(text: &str, level_count: usize) -> AnyResult<Self> {
        let document = Document::parse(text)?;
        let root = document.root_element();
        if !root.has_tag_name("levelset") {
            Err(CcxError::NotLevelset(root.tag_name().name().to_string()))?;
        }

        let mut levelset = Self::default();
        for (name, target) in [
            ("description", &mut levelset.description),
            ("copyright", &mut levelset.copyright),
            ("author", &mut levelset.author),
        ] {
            if let Some(value) = root.attribute(name) {
                *target = value.to_string();
            }
        }
        levelset.compatibility.read_attributes(root);
        levelset.page_properties.read_attributes(root);

        let template = CcxLevel {
            author: levelset.author.clone(),
            compatibility: levelset.compatibility,
            ..Default::default()
        };
        levelset.levels = vec![template; level_count];

        for element in root.descendants().filter(|node| node.has_tag_name("level")) {
            let number = element
                .attribute("number")
                .and_then(|value| value.trim().parse::<usize>().ok());
            match number {
                Some(number) if (1..=level_count).contains(&number) => {
                    let level = levelset.read_level(element);
                    levelset.levels[number - 1] = level;
                }
                _ => warn!("Skipping CCX level with invalid number {number:?}"),
            }
        }

        if let Some(style) = find_descendant(root, "style") {
            if style.parent() == Some(root) {
                levelset.style_sheet = text_of(style);
            }
        }

        debug!(
            "Read CCX metadata: {:?} by {:?}, {level_count} levels",
            levelset.description, levelset.author
        );
        Ok(levelset)
    }

    /// Reads a CCX file of a levelset holding `level_count` levels.
    pub fn read_file(path: impl AsRef<Path>, level_count: usize) -> AnyResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .otherwise(format!("couldn't read {}", path.display()))?;
        Self::parse(&text, level_count)
    }

    fn read_level(&self, element: Node) -> CcxLevel {
        let mut level = CcxLevel {
            author: element.attribute("author").unwrap_or(self.author.as_str()).to_string(),
            compatibility: self.compatibility,
            ..Default::default()
        };
        level.compatibility.read_attributes(element);

        if let Some(prologue) = find_descendant(element, "prologue") {
            level.prologue = self.read_pages(prologue);
        }
        if let Some(epilogue) = find_descendant(element, "epilogue") {
            level.epilogue = self.read_pages(epilogue);
        }
        level
    }

    fn read_pages(&self, element: Node) -> Vec<Page> {
        element
            .descendants()
            .filter(|node| node.has_tag_name("page"))
            .map(|node| {
                let mut properties = self.page_properties.clone();
                properties.read_attributes(node);
                Page {
                    text: text_of(node),
                    properties,
                }
            })
            .collect()
    }
}
