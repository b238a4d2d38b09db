use crate::operation::ParamValue;
use crate::transforms;
use crate::usage::UsageTracker;

// ---------------------------------------------------------------------------
// Parameter specs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Text,
    Number,
}

#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub default: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    /// Coerce a raw prompt answer into a recorded parameter. An empty answer
    /// takes the default; numeric params fall back to text when they don't
    /// parse, leaving the transform to degrade.
    pub fn coerce(&self, raw: &str) -> ParamValue {
        let raw = if raw.is_empty() { self.default } else { raw };
        match self.kind {
            ParamKind::Number => match raw.trim().parse::<f64>() {
                Ok(n) => ParamValue::Number(n),
                Err(_) => ParamValue::Text(raw.to_string()),
            },
            ParamKind::Text => ParamValue::Text(raw.to_string()),
        }
    }

    pub fn default_value(&self) -> ParamValue {
        self.coerce(self.default)
    }
}

// ---------------------------------------------------------------------------
// TransformDescriptor
// ---------------------------------------------------------------------------

pub type TransformFn = fn(&str, &[ParamValue]) -> String;

pub struct TransformDescriptor {
    pub key: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    pub apply: TransformFn,
}

const NO_PARAMS: &[ParamSpec] = &[];

const SEPARATOR_PARAM: &[ParamSpec] = &[ParamSpec {
    name: "separator",
    description: "Separator text",
    default: ", ",
    kind: ParamKind::Text,
}];

const PATTERN_PARAM: &[ParamSpec] = &[ParamSpec {
    name: "pattern",
    description: "Regular expression",
    default: "",
    kind: ParamKind::Text,
}];

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

static BUILTIN: &[TransformDescriptor] = &[
    TransformDescriptor {
        key: "upper-case",
        display_name: "Upper Case",
        description: "Uppercase everything",
        params: NO_PARAMS,
        apply: transforms::upper_case,
    },
    TransformDescriptor {
        key: "lower-case",
        display_name: "Lower Case",
        description: "Lowercase everything",
        params: NO_PARAMS,
        apply: transforms::lower_case,
    },
    TransformDescriptor {
        key: "capitalize",
        display_name: "Capitalize",
        description: "Title Case each word",
        params: NO_PARAMS,
        apply: transforms::capitalize,
    },
    TransformDescriptor {
        key: "camel-case",
        display_name: "camelCase",
        description: "Join words in camelCase",
        params: NO_PARAMS,
        apply: transforms::camel_case,
    },
    TransformDescriptor {
        key: "pascal-case",
        display_name: "PascalCase",
        description: "Join words in PascalCase",
        params: NO_PARAMS,
        apply: transforms::pascal_case,
    },
    TransformDescriptor {
        key: "snake-case",
        display_name: "snake_case",
        description: "Join words with underscores",
        params: NO_PARAMS,
        apply: transforms::snake_case,
    },
    TransformDescriptor {
        key: "kebab-case",
        display_name: "kebab-case",
        description: "Join words with hyphens",
        params: NO_PARAMS,
        apply: transforms::kebab_case,
    },
    TransformDescriptor {
        key: "constant-case",
        display_name: "CONSTANT_CASE",
        description: "Uppercase words with underscores",
        params: NO_PARAMS,
        apply: transforms::constant_case,
    },
    TransformDescriptor {
        key: "trim-each-line",
        display_name: "Trim Each Line",
        description: "Strip leading/trailing whitespace per line",
        params: NO_PARAMS,
        apply: transforms::trim_each_line,
    },
    TransformDescriptor {
        key: "remove-empty-lines",
        display_name: "Remove Empty Lines",
        description: "Drop blank lines",
        params: NO_PARAMS,
        apply: transforms::remove_empty_lines,
    },
    TransformDescriptor {
        key: "remove-duplicate-lines",
        display_name: "Remove Duplicate Lines",
        description: "Keep the first occurrence of each line",
        params: NO_PARAMS,
        apply: transforms::remove_duplicate_lines,
    },
    TransformDescriptor {
        key: "sort-lines",
        display_name: "Sort Lines",
        description: "Sort lines lexicographically",
        params: NO_PARAMS,
        apply: transforms::sort_lines,
    },
    TransformDescriptor {
        key: "reverse-lines",
        display_name: "Reverse Lines",
        description: "Reverse line order",
        params: NO_PARAMS,
        apply: transforms::reverse_lines,
    },
    TransformDescriptor {
        key: "join-lines",
        display_name: "Join Lines",
        description: "Join all lines with a separator",
        params: SEPARATOR_PARAM,
        apply: transforms::join_lines,
    },
    TransformDescriptor {
        key: "split-on",
        display_name: "Split On",
        description: "Split on a separator, one piece per line",
        params: SEPARATOR_PARAM,
        apply: transforms::split_on,
    },
    TransformDescriptor {
        key: "prefix-lines",
        display_name: "Prefix Lines",
        description: "Prepend text to every line",
        params: &[ParamSpec {
            name: "prefix",
            description: "Text to prepend",
            default: "",
            kind: ParamKind::Text,
        }],
        apply: transforms::prefix_lines,
    },
    TransformDescriptor {
        key: "suffix-lines",
        display_name: "Suffix Lines",
        description: "Append text to every line",
        params: &[ParamSpec {
            name: "suffix",
            description: "Text to append",
            default: "",
            kind: ParamKind::Text,
        }],
        apply: transforms::suffix_lines,
    },
    TransformDescriptor {
        key: "number-lines",
        display_name: "Number Lines",
        description: "Prefix each line with its 1-based index",
        params: NO_PARAMS,
        apply: transforms::number_lines,
    },
    TransformDescriptor {
        key: "wrap-text",
        display_name: "Wrap Text",
        description: "Greedy word wrap at a column width",
        params: &[ParamSpec {
            name: "width",
            description: "Maximum line width",
            default: "80",
            kind: ParamKind::Number,
        }],
        apply: transforms::wrap_text,
    },
    TransformDescriptor {
        key: "regex-replace",
        display_name: "Regex Replace",
        description: "Replace every regex match",
        params: &[
            ParamSpec {
                name: "pattern",
                description: "Regular expression",
                default: "",
                kind: ParamKind::Text,
            },
            ParamSpec {
                name: "replacement",
                description: "Replacement text ($1 for groups)",
                default: "",
                kind: ParamKind::Text,
            },
        ],
        apply: transforms::regex_replace,
    },
    TransformDescriptor {
        key: "keep-matching-lines",
        display_name: "Keep Matching Lines",
        description: "Keep only lines matching a regex",
        params: PATTERN_PARAM,
        apply: transforms::keep_matching_lines,
    },
    TransformDescriptor {
        key: "remove-matching-lines",
        display_name: "Remove Matching Lines",
        description: "Drop lines matching a regex",
        params: PATTERN_PARAM,
        apply: transforms::remove_matching_lines,
    },
    TransformDescriptor {
        key: "base64-encode",
        display_name: "Base64 Encode",
        description: "Encode as standard base64",
        params: NO_PARAMS,
        apply: transforms::base64_encode,
    },
    TransformDescriptor {
        key: "base64-decode",
        display_name: "Base64 Decode",
        description: "Decode standard base64",
        params: NO_PARAMS,
        apply: transforms::base64_decode,
    },
    TransformDescriptor {
        key: "json-pretty",
        display_name: "JSON Pretty-Print",
        description: "Re-indent JSON",
        params: NO_PARAMS,
        apply: transforms::json_pretty,
    },
    TransformDescriptor {
        key: "json-minify",
        display_name: "JSON Minify",
        description: "Compact JSON onto one line",
        params: NO_PARAMS,
        apply: transforms::json_minify,
    },
    TransformDescriptor {
        key: "object-to-json",
        display_name: "Object Literal to JSON",
        description: "Parse a JS-style object literal into JSON",
        params: NO_PARAMS,
        apply: transforms::object_to_json,
    },
    TransformDescriptor {
        key: "extract-number",
        display_name: "Extract Formatted Number",
        description: "Parse a currency/grouped number",
        params: NO_PARAMS,
        apply: transforms::extract_number,
    },
    TransformDescriptor {
        key: "sum-numbers",
        display_name: "Sum All Numbers",
        description: "Sum one number per line",
        params: NO_PARAMS,
        apply: transforms::sum_numbers,
    },
    TransformDescriptor {
        key: "subtract-numbers",
        display_name: "Subtract All Numbers",
        description: "First line minus the rest",
        params: NO_PARAMS,
        apply: transforms::subtract_numbers,
    },
    TransformDescriptor {
        key: "remove-wrapping",
        display_name: "Remove Wrapping",
        description: "Strip one layer of brackets or quotes",
        params: NO_PARAMS,
        apply: transforms::remove_wrapping,
    },
    TransformDescriptor {
        key: "filter-value-by-key",
        display_name: "Filter Value by Key",
        description: "Extract the value following a key",
        params: &[ParamSpec {
            name: "key",
            description: "Key to look up",
            default: "",
            kind: ParamKind::Text,
        }],
        apply: transforms::filter_value_by_key,
    },
];

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// The static transform table: lookup by key, enumeration in definition
/// order, and usage-ranked enumeration for menu display.
#[derive(Clone, Copy)]
pub struct Registry {
    descriptors: &'static [TransformDescriptor],
}

impl Registry {
    pub fn builtin() -> Self {
        Self {
            descriptors: BUILTIN,
        }
    }

    pub fn get(&self, key: &str) -> Option<&'static TransformDescriptor> {
        self.descriptors.iter().find(|d| d.key == key)
    }

    pub fn all(&self) -> &'static [TransformDescriptor] {
        self.descriptors
    }

    /// Descriptors ordered by decayed usage score, descending. The sort is
    /// stable, so unused transforms keep their definition order.
    pub fn ranked(
        &self,
        usage: &UsageTracker,
        now: i64,
        decay_window_ms: i64,
    ) -> Vec<&'static TransformDescriptor> {
        let mut ranked: Vec<&'static TransformDescriptor> = self.descriptors.iter().collect();
        ranked.sort_by(|a, b| {
            let sa = usage.score(a.key, now, decay_window_ms);
            let sb = usage.score(b.key, now, decay_window_ms);
            sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
