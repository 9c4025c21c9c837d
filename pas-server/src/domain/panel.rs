//! Visibility state of the unit side panel.

use serde::Serialize;

use super::UnitId;

/// What the unit panel currently shows.
///
/// A single variant replaces the "visible" flag plus "selected id" pair, so
/// a selected unit inside a hidden panel cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "view", content = "unitId", rename_all = "camelCase")]
pub enum UnitPanel {
    /// The ordered unit list.
    #[default]
    ListView,
    /// Details of a single unit.
    DetailView(UnitId),
    /// Panel collapsed; the map takes the whole screen.
    Hidden,
}

impl UnitPanel {
    /// Open the detail view for a unit, showing the panel if it was hidden.
    pub fn select(self, id: UnitId) -> Self {
        UnitPanel::DetailView(id)
    }

    /// The panel's close/open button.
    ///
    /// From a detail view this goes back to the list; otherwise it flips
    /// between the list and the collapsed panel.
    pub fn toggle(self) -> Self {
        match self {
            UnitPanel::DetailView(_) => UnitPanel::ListView,
            UnitPanel::ListView => UnitPanel::Hidden,
            UnitPanel::Hidden => UnitPanel::ListView,
        }
    }

    pub fn selected_unit(self) -> Option<UnitId> {
        match self {
            UnitPanel::DetailView(id) => Some(id),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_list() {
        assert_eq!(UnitPanel::default(), UnitPanel::ListView);
    }

    #[test]
    fn toggle_cycles_list_and_hidden() {
        let p = UnitPanel::ListView.toggle();
        assert_eq!(p, UnitPanel::Hidden);
        assert_eq!(p.toggle(), UnitPanel::ListView);
    }

    #[test]
    fn toggle_from_detail_returns_to_list() {
        let p = UnitPanel::ListView.select(42);
        assert_eq!(p.selected_unit(), Some(42));
        assert_eq!(p.toggle(), UnitPanel::ListView);
    }

    #[test]
    fn select_from_hidden_shows_panel() {
        let p = UnitPanel::Hidden.select(3);
        assert_eq!(p, UnitPanel::DetailView(3));
    }

    #[test]
    fn serialized_form() {
        let json = serde_json::to_value(UnitPanel::DetailView(9)).unwrap();
        assert_eq!(json, serde_json::json!({ "view": "detailView", "unitId": 9 }));

        let json = serde_json::to_value(UnitPanel::Hidden).unwrap();
        assert_eq!(json, serde_json::json!({ "view": "hidden" }));
    }
}
