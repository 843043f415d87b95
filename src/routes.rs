use std::sync::Arc;

use axum::{Form, extract::State, response::Html};
use serde::Deserialize;

use crate::{error::AppError, render, state::AppState, store::Store};

/// Raw management form. Which submit button was pressed arrives as the
/// presence of its field, matching the page template.
#[derive(Deserialize)]
pub struct RegistryForm {
    add: Option<String>,
    delete: Option<String>,
    key: Option<String>,
    value: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum Action {
    Add { key: String, value: String },
    Delete { key: String },
}

impl RegistryForm {
    /// `None` when no button or a required field is missing; such a
    /// submission mutates nothing and the page is re-rendered as-is.
    pub fn action(self) -> Option<Action> {
        if self.add.is_some() {
            Some(Action::Add {
                key: self.key?,
                value: self.value?,
            })
        } else if self.delete.is_some() {
            Some(Action::Delete { key: self.key? })
        } else {
            None
        }
    }
}

pub async fn apply_action<S: Store>(store: &S, action: Action) -> Result<(), AppError> {
    match action {
        Action::Add { key, value } => store.set_label(&key, &value).await,
        Action::Delete { key } => store.delete_label(&key).await,
    }
}

pub async fn show_index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    render_page(&state.store).await
}

pub async fn mutate_index(
    State(state): State<Arc<AppState>>,
    Form(form): Form<RegistryForm>,
) -> Result<Html<String>, AppError> {
    if let Some(action) = form.action() {
        apply_action(&state.store, action).await?;
    }

    render_page(&state.store).await
}

async fn render_page<S: Store>(store: &S) -> Result<Html<String>, AppError> {
    let registry = store.registry().await?;
    let attendance = store.attendance().await?;

    Ok(Html(render::index(&registry, &attendance)))
}

#[cfg(test)]
mod tests {
    use super::{Action, RegistryForm, apply_action};
    use crate::store::{Store, memory::MemoryStore};

    fn form(
        add: Option<&str>,
        delete: Option<&str>,
        key: Option<&str>,
        value: Option<&str>,
    ) -> RegistryForm {
        RegistryForm {
            add: add.map(String::from),
            delete: delete.map(String::from),
            key: key.map(String::from),
            value: value.map(String::from),
        }
    }

    #[test]
    fn add_button_yields_add_action() {
        assert_eq!(
            form(Some("1"), None, Some("04A1"), Some("alice")).action(),
            Some(Action::Add {
                key: "04A1".to_string(),
                value: "alice".to_string(),
            })
        );
    }

    #[test]
    fn add_without_required_fields_is_rejected() {
        assert_eq!(form(Some("1"), None, Some("04A1"), None).action(), None);
        assert_eq!(form(Some("1"), None, None, Some("alice")).action(), None);
    }

    #[test]
    fn delete_without_key_is_rejected() {
        assert_eq!(form(None, Some("1"), None, None).action(), None);
    }

    #[test]
    fn no_button_is_rejected() {
        assert_eq!(form(None, None, Some("04A1"), Some("alice")).action(), None);
    }

    #[tokio::test]
    async fn add_overwrites_an_existing_label() {
        let store = MemoryStore::default();

        apply_action(
            &store,
            Action::Add {
                key: "A".to_string(),
                value: "1".to_string(),
            },
        )
        .await
        .unwrap();
        apply_action(
            &store,
            Action::Add {
                key: "A".to_string(),
                value: "2".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            store.registry().await.unwrap(),
            vec![("A".to_string(), "2".to_string())]
        );
    }

    #[tokio::test]
    async fn delete_of_absent_key_is_a_noop() {
        let store = MemoryStore::default();
        store.set_label("A", "alice").await.unwrap();

        apply_action(
            &store,
            Action::Delete {
                key: "X".to_string(),
            },
        )
        .await
        .unwrap();

        assert_eq!(
            store.registry().await.unwrap(),
            vec![("A".to_string(), "alice".to_string())]
        );
    }

    #[tokio::test]
    async fn delete_removes_the_entry() {
        let store = MemoryStore::default();
        store.set_label("A", "alice").await.unwrap();

        apply_action(
            &store,
            Action::Delete {
                key: "A".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(store.registry().await.unwrap().is_empty());
    }
}
