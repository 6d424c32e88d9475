//! Shared test support: an in-memory store implementing every domain port,
//! plus helpers for building the app under test and seeding accounts.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App};
use async_trait::async_trait;
use uuid::Uuid;

use larder::domain::attribute::{Attribute, AttributeKind, AttributeName};
use larder::domain::credentials::{generate_token, hash_password, token_digest};
use larder::domain::ports::{
    AccessToken, AccessTokenRepository, AttributePersistenceError, AttributeRepository,
    ImageStore, ImageStoreError, ProfileChanges, RecipeFilter, RecipePersistenceError,
    RecipeRepository, StoredImage, TokenPersistenceError, UserPersistenceError, UserRepository,
};
use larder::domain::recipe::Recipe;
use larder::domain::user::{EmailAddress, User};
use larder::inbound::http::state::HttpState;
use larder::server::configure_api;

/// Password used for every seeded account.
pub const TEST_PASSWORD: &str = "testpass123";

#[derive(Default)]
struct StoreInner {
    users: Vec<User>,
    tokens: Vec<AccessToken>,
    recipes: Vec<Recipe>,
    attributes: Vec<Attribute>,
    // Ordered pairs keep association iteration deterministic.
    associations: Vec<(Uuid, Uuid)>,
    images: HashMap<String, Vec<u8>>,
}

/// In-memory store standing in for PostgreSQL and the media directory.
///
/// One instance implements every port; handler state holds it behind
/// multiple `Arc<dyn ...>` handles, the same shape the Diesel adapters use.
#[derive(Clone, Default)]
pub struct MemoryStore(Arc<Mutex<StoreInner>>);

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.0.lock().expect("store mutex poisoned")
    }

    /// Number of attribute records of one kind owned by `owner`.
    pub fn attribute_count(&self, owner: Uuid, kind: AttributeKind) -> usize {
        self.lock()
            .attributes
            .iter()
            .filter(|attribute| attribute.owner == owner && attribute.kind == kind)
            .count()
    }

    /// True when a recipe row with this id still exists, regardless of owner.
    pub fn recipe_exists(&self, id: Uuid) -> bool {
        self.lock().recipes.iter().any(|recipe| recipe.id == id)
    }

    /// Stored blob keys, sorted for stable assertions.
    pub fn image_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.lock().images.keys().cloned().collect();
        keys.sort();
        keys
    }

    fn hydrate(inner: &StoreInner, recipe: &Recipe) -> Recipe {
        let mut hydrated = recipe.clone();
        hydrated.tags.clear();
        hydrated.ingredients.clear();
        for (recipe_id, attribute_id) in &inner.associations {
            if *recipe_id != recipe.id {
                continue;
            }
            if let Some(attribute) = inner
                .attributes
                .iter()
                .find(|attribute| attribute.id == *attribute_id)
            {
                match attribute.kind {
                    AttributeKind::Tag => hydrated.tags.push(attribute.clone()),
                    AttributeKind::Ingredient => hydrated.ingredients.push(attribute.clone()),
                }
            }
        }
        hydrated
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut inner = self.lock();
        if inner.users.iter().any(|existing| existing.email == user.email) {
            return Err(UserPersistenceError::DuplicateEmail);
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().users.iter().find(|user| user.id == id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn update_profile(
        &self,
        id: Uuid,
        changes: ProfileChanges,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut inner = self.lock();
        let Some(user) = inner.users.iter_mut().find(|user| user.id == id) else {
            return Ok(None);
        };
        if let Some(display_name) = changes.display_name {
            user.display_name = display_name;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl AccessTokenRepository for MemoryStore {
    async fn insert(&self, token: &AccessToken) -> Result<(), TokenPersistenceError> {
        self.lock().tokens.push(token.clone());
        Ok(())
    }

    async fn find_active_user(
        &self,
        token_digest: &str,
    ) -> Result<Option<User>, TokenPersistenceError> {
        let inner = self.lock();
        let Some(token) = inner
            .tokens
            .iter()
            .find(|token| token.token_digest == token_digest)
        else {
            return Ok(None);
        };
        Ok(inner
            .users
            .iter()
            .find(|user| user.id == token.user_id && user.is_active)
            .cloned())
    }
}

#[async_trait]
impl AttributeRepository for MemoryStore {
    async fn get_or_create(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        name: &AttributeName,
    ) -> Result<Attribute, AttributePersistenceError> {
        let mut inner = self.lock();
        if let Some(existing) = inner.attributes.iter().find(|attribute| {
            attribute.owner == owner && attribute.kind == kind && &attribute.name == name
        }) {
            return Ok(existing.clone());
        }
        let attribute = Attribute::new(owner, kind, name.clone());
        inner.attributes.push(attribute.clone());
        Ok(attribute)
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        assigned_only: bool,
    ) -> Result<Vec<Attribute>, AttributePersistenceError> {
        let inner = self.lock();
        let mut attributes: Vec<Attribute> = inner
            .attributes
            .iter()
            .filter(|attribute| attribute.owner == owner && attribute.kind == kind)
            .filter(|attribute| {
                !assigned_only
                    || inner
                        .associations
                        .iter()
                        .any(|(_, attribute_id)| *attribute_id == attribute.id)
            })
            .cloned()
            .collect();
        attributes.sort_by(|a, b| b.name.as_ref().cmp(a.name.as_ref()));
        Ok(attributes)
    }

    async fn rename_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        id: Uuid,
        name: AttributeName,
    ) -> Result<Option<Attribute>, AttributePersistenceError> {
        let mut inner = self.lock();
        let Some(attribute) = inner.attributes.iter_mut().find(|attribute| {
            attribute.id == id && attribute.owner == owner && attribute.kind == kind
        }) else {
            return Ok(None);
        };
        attribute.name = name;
        Ok(Some(attribute.clone()))
    }

    async fn delete_for_owner(
        &self,
        owner: Uuid,
        kind: AttributeKind,
        id: Uuid,
    ) -> Result<bool, AttributePersistenceError> {
        let mut inner = self.lock();
        let before = inner.attributes.len();
        inner.attributes.retain(|attribute| {
            !(attribute.id == id && attribute.owner == owner && attribute.kind == kind)
        });
        let deleted = inner.attributes.len() < before;
        if deleted {
            inner
                .associations
                .retain(|(_, attribute_id)| *attribute_id != id);
        }
        Ok(deleted)
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn insert(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        self.lock().recipes.push(recipe.clone());
        Ok(())
    }

    async fn list_for_owner(
        &self,
        owner: Uuid,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let inner = self.lock();
        let matches_filter = |recipe: &Recipe, wanted: &Option<Vec<Uuid>>| {
            wanted.as_ref().map_or(true, |ids| {
                inner.associations.iter().any(|(recipe_id, attribute_id)| {
                    *recipe_id == recipe.id && ids.contains(attribute_id)
                })
            })
        };

        let mut recipes: Vec<Recipe> = inner
            .recipes
            .iter()
            .filter(|recipe| recipe.owner == owner)
            .filter(|recipe| matches_filter(recipe, &filter.tag_ids))
            .filter(|recipe| matches_filter(recipe, &filter.ingredient_ids))
            .map(|recipe| MemoryStore::hydrate(&inner, recipe))
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn find_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<Option<Recipe>, RecipePersistenceError> {
        let inner = self.lock();
        Ok(inner
            .recipes
            .iter()
            .find(|recipe| recipe.owner == owner && recipe.id == id)
            .map(|recipe| MemoryStore::hydrate(&inner, recipe)))
    }

    async fn update(&self, recipe: &Recipe) -> Result<(), RecipePersistenceError> {
        let mut inner = self.lock();
        if let Some(stored) = inner.recipes.iter_mut().find(|stored| stored.id == recipe.id) {
            stored.title.clone_from(&recipe.title);
            stored.description.clone_from(&recipe.description);
            stored.time_minutes = recipe.time_minutes;
            stored.price = recipe.price.clone();
            stored.link.clone_from(&recipe.link);
        }
        Ok(())
    }

    async fn delete_for_owner(
        &self,
        owner: Uuid,
        id: Uuid,
    ) -> Result<bool, RecipePersistenceError> {
        let mut inner = self.lock();
        let before = inner.recipes.len();
        inner
            .recipes
            .retain(|recipe| !(recipe.owner == owner && recipe.id == id));
        let deleted = inner.recipes.len() < before;
        if deleted {
            inner.associations.retain(|(recipe_id, _)| *recipe_id != id);
        }
        Ok(deleted)
    }

    async fn set_associations(
        &self,
        recipe_id: Uuid,
        kind: AttributeKind,
        attribute_ids: &[Uuid],
    ) -> Result<(), RecipePersistenceError> {
        let mut inner = self.lock();
        let kind_ids: Vec<Uuid> = inner
            .attributes
            .iter()
            .filter(|attribute| attribute.kind == kind)
            .map(|attribute| attribute.id)
            .collect();
        inner.associations.retain(|(existing_recipe, attribute_id)| {
            !(*existing_recipe == recipe_id && kind_ids.contains(attribute_id))
        });
        for attribute_id in attribute_ids {
            let pair = (recipe_id, *attribute_id);
            if !inner.associations.contains(&pair) {
                inner.associations.push(pair);
            }
        }
        Ok(())
    }

    async fn replace_image_key(
        &self,
        owner: Uuid,
        id: Uuid,
        image_key: &str,
    ) -> Result<Option<Option<String>>, RecipePersistenceError> {
        let mut inner = self.lock();
        let Some(recipe) = inner
            .recipes
            .iter_mut()
            .find(|recipe| recipe.owner == owner && recipe.id == id)
        else {
            return Ok(None);
        };
        let previous = recipe.image_key.clone();
        recipe.image_key = Some(image_key.to_owned());
        Ok(Some(previous))
    }
}

#[async_trait]
impl ImageStore for MemoryStore {
    async fn store(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, ImageStoreError> {
        let extension = match content_type {
            "image/jpeg" => "jpg",
            "image/png" => "png",
            _ => return Err(ImageStoreError::unsupported(content_type)),
        };
        let key = format!("{}.{extension}", Uuid::new_v4());
        self.lock().images.insert(key.clone(), bytes.to_vec());
        Ok(StoredImage { key })
    }

    async fn remove(&self, key: &str) -> Result<(), ImageStoreError> {
        self.lock().images.remove(key);
        Ok(())
    }
}

/// Build handler state backed by one shared in-memory store.
pub fn test_state() -> (MemoryStore, web::Data<HttpState>) {
    let store = MemoryStore::default();
    let state = HttpState::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );
    (store, web::Data::new(state))
}

/// Build the app under test with the full API surface registered.
pub fn test_app(
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(state).configure(configure_api)
}

/// Seed an active account and an issued token, bypassing the HTTP surface.
pub async fn seed_user(store: &MemoryStore, email: &str) -> (User, String) {
    let user = User::new(
        EmailAddress::new(email).expect("valid email"),
        "Test User",
        hash_password(TEST_PASSWORD).expect("hashable password"),
    );
    UserRepository::insert(store, &user)
        .await
        .expect("user inserted");

    let token = generate_token();
    AccessTokenRepository::insert(store, &AccessToken::new(user.id, token_digest(&token)))
        .await
        .expect("token inserted");
    (user, token)
}

/// `Authorization` header tuple for a seeded token.
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
