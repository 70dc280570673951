use crate::contract::model::{Feed, User};
use crate::infra::storage::entity::{feed, user};

impl From<user::Model> for User {
    fn from(m: user::Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
        }
    }
}

impl From<feed::Model> for Feed {
    fn from(m: feed::Model) -> Self {
        Self {
            id: m.id,
            session_id: m.session_id,
            name: m.name,
            description: m.description,
            date: m.date,
            is_on_diet: m.is_on_diet,
        }
    }
}
