use crate::{
    error::RecipeError,
    jwt::SessionData,
    schema::{Id, UserRole},
};

const ACTION_TABLE: &[(UserRole, &[ActionType])] = &[
    (
        UserRole::User,
        &[ActionType::ManageOwnLists, ActionType::ManageOwnRecipes],
    ),
    (
        UserRole::Admin,
        &[
            ActionType::ManageOwnLists,
            ActionType::ManageOwnRecipes,
            ActionType::ManageAllRecipes,
            ActionType::ManageCatalogue,
        ],
    ),
];

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum ActionType {
    /// Favorites, shopping cart and subscriptions.
    ManageOwnLists,
    ManageOwnRecipes,

    ManageAllRecipes,
    /// Tags and ingredients.
    ManageCatalogue,
}

impl ActionType {
    pub fn authenticate(self, session: &SessionData) -> bool {
        ACTION_TABLE
            .iter()
            .find(|(role, _)| *role == session.role)
            .map(|(_, actions)| actions.contains(&self))
            .unwrap_or(false)
    }
}

impl SessionData {
    pub fn authenticate(&self, action: ActionType) -> Result<(), RecipeError> {
        if !action.authenticate(self) {
            return Err(RecipeError::Forbidden(String::from(
                "You don't have permission to perform this action",
            )));
        }
        Ok(())
    }

    /// Authors manage their own recipes; admins manage every recipe.
    pub fn authenticate_author(&self, author_id: Id) -> Result<(), RecipeError> {
        self.authenticate(ActionType::ManageOwnRecipes)?;
        if author_id == self.user_id {
            return Ok(());
        }
        self.authenticate(ActionType::ManageAllRecipes)
    }
}
