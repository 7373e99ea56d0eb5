//! Formula descriptors: which attributes a formula needs and how it lays them out.

use crate::{Attribute, Formula, Product};

/// How the present attribute values are combined into one title
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Values joined by a separator
    Joined(&'static str),
    /// Each value preceded by the connector at the same position in `fields`.
    /// The first emitted value drops its connector.
    Phrased(&'static [&'static str]),
}

/// A title composition formula described as data
#[derive(Debug, Clone, Copy)]
pub struct FormulaSpec {
    pub formula: Formula,
    /// Attributes that must all be present
    pub required: &'static [Attribute],
    /// Attributes composed into the title, in order; absent ones are skipped
    pub fields: &'static [Attribute],
    /// Minimum number of `fields` that must be present
    pub min_present: usize,
    pub layout: Layout,
}

const CORE_FIELDS: &[Attribute] = &[
    Attribute::Brand,
    Attribute::Title,
    Attribute::Color,
    Attribute::Size,
];

/// All formulas in generation order
pub static FORMULAS: [FormulaSpec; 5] = [
    FormulaSpec {
        formula: Formula::BrandFirst,
        required: &[Attribute::Brand, Attribute::Title],
        fields: CORE_FIELDS,
        min_present: 0,
        layout: Layout::Joined(" - "),
    },
    FormulaSpec {
        formula: Formula::ProductFirst,
        required: &[Attribute::Title, Attribute::Brand],
        fields: &[
            Attribute::Title,
            Attribute::Brand,
            Attribute::Color,
            Attribute::Size,
        ],
        min_present: 0,
        layout: Layout::Joined(" - "),
    },
    FormulaSpec {
        formula: Formula::AttributeRich,
        required: &[],
        fields: &[
            Attribute::Brand,
            Attribute::ProductType,
            Attribute::Color,
            Attribute::Size,
            Attribute::Material,
        ],
        min_present: 3,
        layout: Layout::Joined(" - "),
    },
    FormulaSpec {
        formula: Formula::Compact,
        required: &[Attribute::Brand, Attribute::Title],
        fields: CORE_FIELDS,
        min_present: 0,
        layout: Layout::Joined(" | "),
    },
    FormulaSpec {
        formula: Formula::SeoNatural,
        required: &[Attribute::Brand, Attribute::Title],
        fields: CORE_FIELDS,
        min_present: 0,
        layout: Layout::Phrased(&["", " ", " in ", ", "]),
    },
];

impl FormulaSpec {
    pub fn for_formula(formula: Formula) -> &'static FormulaSpec {
        // FORMULAS is indexed in Formula declaration order
        &FORMULAS[formula as usize]
    }

    /// Compose the untruncated title, or None when the product does not qualify
    pub fn compose(&self, product: &Product) -> Option<String> {
        if self
            .required
            .iter()
            .any(|attr| product.attribute(*attr).is_none())
        {
            return None;
        }

        let present: Vec<(usize, &str)> = self
            .fields
            .iter()
            .enumerate()
            .filter_map(|(idx, attr)| product.attribute(*attr).map(|v| (idx, v)))
            .collect();
        if present.is_empty() || present.len() < self.min_present {
            return None;
        }

        let composed = match self.layout {
            Layout::Joined(sep) => present
                .iter()
                .map(|(_, v)| *v)
                .collect::<Vec<_>>()
                .join(sep),
            Layout::Phrased(connectors) => {
                let mut out = String::new();
                for (pos, (idx, value)) in present.iter().enumerate() {
                    if pos > 0 {
                        out.push_str(connectors.get(*idx).copied().unwrap_or(" "));
                    }
                    out.push_str(value);
                }
                out
            }
        };
        Some(composed)
    }
}
