use async_trait::async_trait;
use common::models::Recipe;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Storage for recipes keyed by city id.
///
/// Ids are allocated by the store from a single counter shared by all cities.
/// They start at 1, only increase, and are never reused after a removal.
#[async_trait]
pub trait RecipeStore: Send + Sync {
    /// Append a recipe to the city's list and return it with its new id.
    async fn add(&self, city_id: &str, content: String) -> Recipe;

    /// Remove the recipe with `recipe_id` from the city's list. Returns
    /// `false`, leaving the store untouched, when there is no such recipe.
    async fn remove(&self, city_id: &str, recipe_id: u64) -> bool;

    /// Recipes for the city in insertion order; empty when there are none.
    async fn list(&self, city_id: &str) -> Vec<Recipe>;
}

struct Recipes {
    next_id: u64,
    by_city: HashMap<String, Vec<Recipe>>,
}

/// Process-local recipe store. Contents are lost on restart.
pub struct InMemoryRecipeStore {
    // Counter and lists share one lock so allocation order matches append order
    inner: RwLock<Recipes>,
}

impl InMemoryRecipeStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Recipes {
                next_id: 1,
                by_city: HashMap::new(),
            }),
        }
    }
}

impl Default for InMemoryRecipeStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecipeStore for InMemoryRecipeStore {
    async fn add(&self, city_id: &str, content: String) -> Recipe {
        let mut inner = self.inner.write().await;

        let recipe = Recipe {
            id: inner.next_id,
            content,
        };
        inner.next_id += 1;

        inner
            .by_city
            .entry(city_id.to_string())
            .or_default()
            .push(recipe.clone());

        recipe
    }

    async fn remove(&self, city_id: &str, recipe_id: u64) -> bool {
        let mut inner = self.inner.write().await;

        let Some(recipes) = inner.by_city.get_mut(city_id) else {
            return false;
        };

        let before = recipes.len();
        recipes.retain(|recipe| recipe.id != recipe_id);
        recipes.len() != before
    }

    async fn list(&self, city_id: &str) -> Vec<Recipe> {
        let inner = self.inner.read().await;
        inner.by_city.get(city_id).cloned().unwrap_or_default()
    }
}
