//! Per-page view state and the render policy derived from it.

use shared::{
    domain::{Entity, EntityKind},
    protocol::SearchResponse,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<E> {
    pub items: Vec<E>,
    pub loading: bool,
    pub error: Option<String>,
    pub search_term: String,
    /// Present only while the items came from the search endpoint.
    pub search_response: Option<SearchResponse<E>>,
}

impl<E> Default for ViewState<E> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            search_term: String::new(),
            search_response: None,
        }
    }
}

/// What the presentation layer should draw for a page.
#[derive(Debug, PartialEq)]
pub enum ListView<'a, E> {
    Loading,
    Error(&'a str),
    Empty(String),
    Table {
        items: &'a [E],
        footer: Option<String>,
    },
}

impl<E: Entity> ViewState<E> {
    pub fn view(&self) -> ListView<'_, E> {
        if self.loading {
            return ListView::Loading;
        }
        if let Some(message) = &self.error {
            return ListView::Error(message);
        }
        if self.items.is_empty() {
            return ListView::Empty(empty_message(E::KIND, &self.search_term));
        }
        ListView::Table {
            items: &self.items,
            footer: self
                .search_response
                .as_ref()
                .map(|response| results_footer(response, &self.search_term)),
        }
    }
}

pub fn empty_message(kind: EntityKind, search_term: &str) -> String {
    if search_term.is_empty() {
        format!("No {} available.", kind.plural())
    } else {
        format!("No {} found matching \"{search_term}\"", kind.plural())
    }
}

pub fn results_footer<E>(response: &SearchResponse<E>, search_term: &str) -> String {
    let mut footer = format!(
        "Showing {} of {} results",
        response.count, response.total_count
    );
    if !search_term.is_empty() {
        footer.push_str(&format!(" for \"{search_term}\""));
    }
    footer
}

#[cfg(test)]
mod tests {
    use shared::domain::{Garage, GarageId};

    use super::*;

    fn garage(id: i64) -> Garage {
        Garage {
            id: GarageId(id),
            garage_name: format!("Garage {id}"),
            garage_code: format!("G{id}"),
            coordinate: "41.0,29.0".into(),
        }
    }

    fn settled(items: Vec<Garage>) -> ViewState<Garage> {
        ViewState {
            items,
            loading: false,
            ..ViewState::default()
        }
    }

    #[test]
    fn initial_state_is_loading() {
        let state = ViewState::<Garage>::default();
        assert!(state.loading);
        assert!(state.items.is_empty());
        assert_eq!(state.view(), ListView::Loading);
    }

    #[test]
    fn loading_wins_over_error_and_items() {
        let mut state = settled(vec![garage(1)]);
        state.loading = true;
        state.error = Some("boom".into());
        assert_eq!(state.view(), ListView::Loading);
    }

    #[test]
    fn error_hides_stale_items() {
        let mut state = settled(vec![garage(1)]);
        state.error = Some("Failed to load garages. Please try again later.".into());
        assert_eq!(
            state.view(),
            ListView::Error("Failed to load garages. Please try again later.")
        );
    }

    #[test]
    fn empty_state_copy_depends_on_search_term() {
        let state = settled(Vec::new());
        assert_eq!(
            state.view(),
            ListView::Empty("No garages available.".into())
        );

        let mut searched = settled(Vec::new());
        searched.search_term = "zzz-no-match".into();
        match searched.view() {
            ListView::Empty(message) => {
                assert_eq!(message, "No garages found matching \"zzz-no-match\"")
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn table_footer_only_in_search_mode() {
        let state = settled(vec![garage(1), garage(2)]);
        match state.view() {
            ListView::Table { items, footer } => {
                assert_eq!(items.len(), 2);
                assert!(footer.is_none());
            }
            other => panic!("unexpected view: {other:?}"),
        }

        let mut searched = settled(vec![garage(2)]);
        searched.search_term = "G2".into();
        searched.search_response = Some(SearchResponse {
            results: vec![garage(2)],
            count: 1,
            total_count: 5,
            page: 0,
            size: 20,
            search_term: "G2".into(),
            has_matches: true,
        });
        match searched.view() {
            ListView::Table { footer, .. } => {
                assert_eq!(footer.as_deref(), Some("Showing 1 of 5 results for \"G2\""))
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }
}
