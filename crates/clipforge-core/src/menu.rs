use crate::registry::{Registry, TransformDescriptor};
use crate::usage::UsageTracker;
use std::fmt;

// ---------------------------------------------------------------------------
// StructuralAction
// ---------------------------------------------------------------------------

/// Menu entries that drive the session rather than transform text. Pinned to
/// fixed positions around the decay-ranked transform list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructuralAction {
    Init,
    Last,
    Finish,
    Save,
    ListSaved,
    ManualEdit,
    Jq,
}

impl StructuralAction {
    pub fn as_str(self) -> &'static str {
        match self {
            StructuralAction::Init => "init",
            StructuralAction::Last => "last",
            StructuralAction::Finish => "finish",
            StructuralAction::Save => "save",
            StructuralAction::ListSaved => "list-saved",
            StructuralAction::ManualEdit => "manual-edit",
            StructuralAction::Jq => "jq",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            StructuralAction::Init => "Start over from the captured input",
            StructuralAction::Last => "Replay the previous session's operations",
            StructuralAction::Finish => "Emit the current value and exit",
            StructuralAction::Save => "Save this operation list as a preset",
            StructuralAction::ListSaved => "Show saved presets",
            StructuralAction::ManualEdit => "Edit the current value in $EDITOR",
            StructuralAction::Jq => "Pipe the current value through jq",
        }
    }
}

impl fmt::Display for StructuralAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MenuEntry
// ---------------------------------------------------------------------------

/// One selectable row of the session menu: a structural action, a transform,
/// or a saved preset. Dispatch is an exhaustive match, never string
/// comparison.
pub enum MenuEntry {
    Structural(StructuralAction),
    Transform(&'static TransformDescriptor),
    Preset(String),
}

impl MenuEntry {
    pub fn label(&self) -> String {
        match self {
            MenuEntry::Structural(action) => action.as_str().to_string(),
            MenuEntry::Transform(d) => d.display_name.to_string(),
            MenuEntry::Preset(name) => format!("preset: {name}"),
        }
    }

    pub fn description(&self) -> String {
        match self {
            MenuEntry::Structural(action) => action.description().to_string(),
            MenuEntry::Transform(d) => d.description.to_string(),
            MenuEntry::Preset(_) => "Replay this saved preset".to_string(),
        }
    }
}

/// Pinned ahead of the ranked transforms, in this order.
const PINNED_HEAD: &[StructuralAction] = &[
    StructuralAction::Finish,
    StructuralAction::Last,
    StructuralAction::Init,
];

/// Pinned behind the ranked transforms and presets, in this order.
const PINNED_TAIL: &[StructuralAction] = &[
    StructuralAction::ManualEdit,
    StructuralAction::Jq,
    StructuralAction::Save,
    StructuralAction::ListSaved,
];

/// Build the session menu: pinned head, transforms by decayed rank, presets
/// by name, pinned tail. `last` only appears while a cached operation list
/// exists.
pub fn build_menu(
    registry: Registry,
    usage: &UsageTracker,
    preset_names: &[String],
    last_available: bool,
    now: i64,
    decay_window_ms: i64,
) -> Vec<MenuEntry> {
    let mut menu = Vec::new();
    for &action in PINNED_HEAD {
        if action == StructuralAction::Last && !last_available {
            continue;
        }
        menu.push(MenuEntry::Structural(action));
    }
    for d in registry.ranked(usage, now, decay_window_ms) {
        menu.push(MenuEntry::Transform(d));
    }
    for name in preset_names {
        menu.push(MenuEntry::Preset(name.clone()));
    }
    for &action in PINNED_TAIL {
        menu.push(MenuEntry::Structural(action));
    }
    menu
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
