//! Composition facade.
//!
//! `Warden` wires the repositories, the staff-role cache, and the
//! privilege resolver together and exposes the surface command handlers
//! call: the read-side resolvers plus the writer operations. Every
//! writer that changes a category's staff roles refreshes that guild's
//! staff-role aggregate before returning, so a privilege check issued
//! after the write observes the new roles.

use std::collections::HashSet;
use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use crate::cache::{CacheRegistry, MokaRoleCache, RoleCache};
use crate::database::models::{Category, GuildSettings};
use crate::database::{CategoryRepo, Database, GuildSettingsRepo};
use crate::error::CoreError;
use crate::i18n::{self, Locale, MismatchResult};
use crate::permissions::{CategorySource, PrivilegeResolver, PrivilegeTier, StaffRoleCache};
use crate::platform::{GuildId, Member, MemberProvider, RoleId, UserId};

/// Guild settings side of the config store.
#[allow(async_fn_in_trait)]
pub trait SettingsStore: Send + Sync {
    async fn find_settings(&self, guild_id: GuildId) -> Result<Option<GuildSettings>, CoreError>;
    async fn ensure_settings(&self, guild_id: GuildId) -> Result<GuildSettings, CoreError>;
    async fn set_language_roles(
        &self,
        guild_id: GuildId,
        english_role_id: Option<RoleId>,
        spanish_role_id: Option<RoleId>,
    ) -> Result<GuildSettings, CoreError>;
    async fn set_default_locale(
        &self,
        guild_id: GuildId,
        locale: Locale,
    ) -> Result<GuildSettings, CoreError>;
}

/// Category side of the config store. Writers return the touched
/// document so the caller can refresh the owning guild's aggregate.
#[allow(async_fn_in_trait)]
pub trait CategoryStore: CategorySource + Clone {
    async fn find_category(&self, id: ObjectId) -> Result<Option<Category>, CoreError>;
    async fn create_category(&self, category: &Category) -> Result<ObjectId, CoreError>;
    async fn set_category_locale(
        &self,
        id: ObjectId,
        locale: Locale,
    ) -> Result<Category, CoreError>;
    async fn set_category_staff_roles(
        &self,
        id: ObjectId,
        staff_role_ids: &[RoleId],
    ) -> Result<Category, CoreError>;
    async fn delete_category(&self, id: ObjectId) -> Result<Category, CoreError>;
}

/// Access-control and locale-resolution core, generic over the config
/// store so tests and alternative backends can inject their own.
pub struct Warden<S, C: Clone> {
    settings: S,
    categories: C,
    staff_roles: StaffRoleCache<C>,
    privileges: PrivilegeResolver<C>,
}

impl Warden<GuildSettingsRepo, CategoryRepo> {
    /// Wire the core over MongoDB with the default Moka role cache.
    pub fn mongo(
        db: &Database,
        cache: &CacheRegistry,
        operators: impl IntoIterator<Item = UserId>,
    ) -> Self {
        Self::new(
            GuildSettingsRepo::new(db, cache),
            CategoryRepo::new(db),
            Arc::new(MokaRoleCache::new(cache)),
            operators,
        )
    }
}

impl<S, C> Warden<S, C>
where
    S: SettingsStore,
    C: CategoryStore,
{
    pub fn new(
        settings: S,
        categories: C,
        backend: Arc<dyn RoleCache>,
        operators: impl IntoIterator<Item = UserId>,
    ) -> Self {
        let staff_roles = StaffRoleCache::new(categories.clone(), backend);
        let privileges = PrivilegeResolver::new(operators, staff_roles.clone());
        Self {
            settings,
            categories,
            staff_roles,
            privileges,
        }
    }

    // ---- read side ----

    /// Aggregated staff role set for a guild.
    pub async fn staff_roles(&self, guild_id: GuildId) -> Result<HashSet<RoleId>, CoreError> {
        self.staff_roles.get(guild_id).await
    }

    /// Drop a guild's cached staff role set; the next read recomputes.
    pub fn invalidate_staff_roles(&self, guild_id: GuildId) {
        self.staff_roles.invalidate(guild_id);
    }

    /// Privilege tier for a member (`None` member resolves to the
    /// `None` tier).
    pub async fn resolve_privilege(
        &self,
        member: Option<&Member>,
    ) -> Result<PrivilegeTier, CoreError> {
        self.privileges.resolve(member).await
    }

    /// Staff check by ID pair, fetching the member from the platform.
    /// Fails closed: any failure answers `false`.
    pub async fn is_staff_user<P: MemberProvider>(
        &self,
        platform: &P,
        guild_id: GuildId,
        user_id: UserId,
    ) -> bool {
        self.privileges.is_staff_user(platform, guild_id, user_id).await
    }

    /// Locale a member should be addressed in.
    pub async fn resolve_locale(&self, member: &Member) -> Result<Locale, CoreError> {
        let settings = self.settings.ensure_settings(member.guild_id).await?;
        Ok(i18n::resolve_locale(member, &settings))
    }

    /// Compare a member's implied language with a category's locale.
    pub async fn detect_mismatch(
        &self,
        member: &Member,
        category_id: ObjectId,
    ) -> Result<MismatchResult, CoreError> {
        let category = self
            .categories
            .find_category(category_id)
            .await?
            .ok_or(CoreError::CategoryNotFound(category_id))?;
        let settings = self.settings.ensure_settings(member.guild_id).await?;
        Ok(i18n::detect_mismatch(member, &category, &settings))
    }

    // ---- write side ----

    /// Configure the guild's language roles. `None` fields are left
    /// unchanged.
    pub async fn set_language_roles(
        &self,
        guild_id: GuildId,
        english_role_id: Option<RoleId>,
        spanish_role_id: Option<RoleId>,
    ) -> Result<GuildSettings, CoreError> {
        self.settings
            .set_language_roles(guild_id, english_role_id, spanish_role_id)
            .await
    }

    /// Set the guild's fallback locale.
    pub async fn set_default_locale(
        &self,
        guild_id: GuildId,
        locale: Locale,
    ) -> Result<GuildSettings, CoreError> {
        self.settings.set_default_locale(guild_id, locale).await
    }

    /// Set a category's locale override.
    pub async fn set_category_locale(
        &self,
        category_id: ObjectId,
        locale: Locale,
    ) -> Result<Category, CoreError> {
        self.categories
            .set_category_locale(category_id, locale)
            .await
    }

    /// Create a category and refresh its guild's staff-role aggregate.
    pub async fn create_category(&self, category: Category) -> Result<ObjectId, CoreError> {
        let guild_id = category.guild_id;
        let id = self.categories.create_category(&category).await?;
        self.staff_roles.refresh(guild_id).await?;
        Ok(id)
    }

    /// Replace a category's staff roles and refresh the aggregate
    /// before returning.
    pub async fn set_category_staff_roles(
        &self,
        category_id: ObjectId,
        staff_role_ids: Vec<RoleId>,
    ) -> Result<Category, CoreError> {
        let category = self
            .categories
            .set_category_staff_roles(category_id, &staff_role_ids)
            .await?;
        self.staff_roles.refresh(category.guild_id).await?;
        Ok(category)
    }

    /// Delete a category and refresh the aggregate before returning.
    pub async fn delete_category(&self, category_id: ObjectId) -> Result<Category, CoreError> {
        let category = self.categories.delete_category(category_id).await?;
        self.staff_roles.refresh(category.guild_id).await?;
        Ok(category)
    }
}

// Mongo repositories as the production config store.

impl SettingsStore for GuildSettingsRepo {
    async fn find_settings(&self, guild_id: GuildId) -> Result<Option<GuildSettings>, CoreError> {
        self.get(guild_id).await
    }

    async fn ensure_settings(&self, guild_id: GuildId) -> Result<GuildSettings, CoreError> {
        self.get_or_create(guild_id).await
    }

    async fn set_language_roles(
        &self,
        guild_id: GuildId,
        english_role_id: Option<RoleId>,
        spanish_role_id: Option<RoleId>,
    ) -> Result<GuildSettings, CoreError> {
        GuildSettingsRepo::set_language_roles(self, guild_id, english_role_id, spanish_role_id)
            .await
    }

    async fn set_default_locale(
        &self,
        guild_id: GuildId,
        locale: Locale,
    ) -> Result<GuildSettings, CoreError> {
        GuildSettingsRepo::set_default_locale(self, guild_id, locale).await
    }
}

impl CategorySource for CategoryRepo {
    async fn categories_for(&self, guild_id: GuildId) -> Result<Vec<Category>, CoreError> {
        self.list(guild_id).await
    }
}

impl CategoryStore for CategoryRepo {
    async fn find_category(&self, id: ObjectId) -> Result<Option<Category>, CoreError> {
        self.get(id).await
    }

    async fn create_category(&self, category: &Category) -> Result<ObjectId, CoreError> {
        self.create(category).await
    }

    async fn set_category_locale(
        &self,
        id: ObjectId,
        locale: Locale,
    ) -> Result<Category, CoreError> {
        self.set_locale(id, locale).await
    }

    async fn set_category_staff_roles(
        &self,
        id: ObjectId,
        staff_role_ids: &[RoleId],
    ) -> Result<Category, CoreError> {
        self.set_staff_roles(id, staff_role_ids).await
    }

    async fn delete_category(&self, id: ObjectId) -> Result<Category, CoreError> {
        self.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;
    use crate::cache::MemoryRoleCache;
    use crate::platform::Permissions;

    const GUILD: GuildId = 1;

    /// In-memory config store covering both trait surfaces.
    #[derive(Clone, Default)]
    struct MemStore {
        settings: Arc<Mutex<HashMap<GuildId, GuildSettings>>>,
        categories: Arc<Mutex<HashMap<ObjectId, Category>>>,
    }

    impl SettingsStore for MemStore {
        async fn find_settings(
            &self,
            guild_id: GuildId,
        ) -> Result<Option<GuildSettings>, CoreError> {
            Ok(self.settings.lock().unwrap().get(&guild_id).cloned())
        }

        async fn ensure_settings(&self, guild_id: GuildId) -> Result<GuildSettings, CoreError> {
            Ok(self
                .settings
                .lock()
                .unwrap()
                .entry(guild_id)
                .or_insert_with(|| GuildSettings::new(guild_id))
                .clone())
        }

        async fn set_language_roles(
            &self,
            guild_id: GuildId,
            english_role_id: Option<RoleId>,
            spanish_role_id: Option<RoleId>,
        ) -> Result<GuildSettings, CoreError> {
            let mut settings = self.settings.lock().unwrap();
            let entry = settings
                .entry(guild_id)
                .or_insert_with(|| GuildSettings::new(guild_id));
            if english_role_id.is_some() {
                entry.english_role_id = english_role_id;
            }
            if spanish_role_id.is_some() {
                entry.spanish_role_id = spanish_role_id;
            }
            Ok(entry.clone())
        }

        async fn set_default_locale(
            &self,
            guild_id: GuildId,
            locale: Locale,
        ) -> Result<GuildSettings, CoreError> {
            let mut settings = self.settings.lock().unwrap();
            let entry = settings
                .entry(guild_id)
                .or_insert_with(|| GuildSettings::new(guild_id));
            entry.default_locale = locale;
            Ok(entry.clone())
        }
    }

    impl CategorySource for MemStore {
        async fn categories_for(&self, guild_id: GuildId) -> Result<Vec<Category>, CoreError> {
            Ok(self
                .categories
                .lock()
                .unwrap()
                .values()
                .filter(|category| category.guild_id == guild_id)
                .cloned()
                .collect())
        }
    }

    impl CategoryStore for MemStore {
        async fn find_category(&self, id: ObjectId) -> Result<Option<Category>, CoreError> {
            Ok(self.categories.lock().unwrap().get(&id).cloned())
        }

        async fn create_category(&self, category: &Category) -> Result<ObjectId, CoreError> {
            let id = ObjectId::new();
            let mut stored = category.clone();
            stored.id = Some(id);
            self.categories.lock().unwrap().insert(id, stored);
            Ok(id)
        }

        async fn set_category_locale(
            &self,
            id: ObjectId,
            locale: Locale,
        ) -> Result<Category, CoreError> {
            let mut categories = self.categories.lock().unwrap();
            let category = categories
                .get_mut(&id)
                .ok_or(CoreError::CategoryNotFound(id))?;
            category.locale = Some(locale);
            Ok(category.clone())
        }

        async fn set_category_staff_roles(
            &self,
            id: ObjectId,
            staff_role_ids: &[RoleId],
        ) -> Result<Category, CoreError> {
            let mut categories = self.categories.lock().unwrap();
            let category = categories
                .get_mut(&id)
                .ok_or(CoreError::CategoryNotFound(id))?;
            category.staff_role_ids = staff_role_ids.to_vec();
            Ok(category.clone())
        }

        async fn delete_category(&self, id: ObjectId) -> Result<Category, CoreError> {
            self.categories
                .lock()
                .unwrap()
                .remove(&id)
                .ok_or(CoreError::CategoryNotFound(id))
        }
    }

    fn warden() -> Warden<MemStore, MemStore> {
        let store = MemStore::default();
        Warden::new(
            store.clone(),
            store,
            Arc::new(MemoryRoleCache::new()),
            [999],
        )
    }

    fn member(user_id: UserId, roles: &[u64]) -> Member {
        Member {
            user_id,
            guild_id: GUILD,
            role_ids: roles.iter().copied().collect(),
            permissions: Some(Permissions(0)),
            guild_owner_id: Some(50),
        }
    }

    #[tokio::test]
    async fn create_category_refreshes_the_aggregate() {
        let warden = warden();

        // Populate the cache with the empty aggregate first, so a stale
        // entry would be observable.
        assert!(warden.staff_roles(GUILD).await.expect("empty").is_empty());

        let mut category = Category::new(GUILD, "support");
        category.staff_role_ids = vec![10, 20];
        warden.create_category(category).await.expect("create");

        assert_eq!(
            warden.staff_roles(GUILD).await.expect("fresh"),
            HashSet::from([10, 20])
        );
    }

    #[tokio::test]
    async fn set_staff_roles_refreshes_the_aggregate() {
        let warden = warden();
        let mut category = Category::new(GUILD, "support");
        category.staff_role_ids = vec![10];
        let id = warden.create_category(category).await.expect("create");

        warden.staff_roles(GUILD).await.expect("warm the cache");
        warden
            .set_category_staff_roles(id, vec![30, 40])
            .await
            .expect("update");

        assert_eq!(
            warden.staff_roles(GUILD).await.expect("fresh"),
            HashSet::from([30, 40])
        );
    }

    #[tokio::test]
    async fn delete_category_refreshes_the_aggregate() {
        let warden = warden();
        let mut first = Category::new(GUILD, "support");
        first.staff_role_ids = vec![10];
        let mut second = Category::new(GUILD, "appeals");
        second.staff_role_ids = vec![20];

        let id = warden.create_category(first).await.expect("first");
        warden.create_category(second).await.expect("second");
        warden.staff_roles(GUILD).await.expect("warm the cache");

        warden.delete_category(id).await.expect("delete");
        assert_eq!(
            warden.staff_roles(GUILD).await.expect("fresh"),
            HashSet::from([20])
        );
    }

    #[tokio::test]
    async fn explicit_invalidation_forces_recomputation() {
        let warden = warden();
        let mut category = Category::new(GUILD, "support");
        category.staff_role_ids = vec![10];
        let id = warden.create_category(category).await.expect("create");
        warden.staff_roles(GUILD).await.expect("warm the cache");

        // Mutate behind the cache's back, as an external writer would.
        warden
            .categories
            .set_category_staff_roles(id, &[70])
            .await
            .expect("raw update");
        assert_eq!(
            warden.staff_roles(GUILD).await.expect("stale"),
            HashSet::from([10])
        );

        warden.invalidate_staff_roles(GUILD);
        assert_eq!(
            warden.staff_roles(GUILD).await.expect("fresh"),
            HashSet::from([70])
        );
    }

    #[tokio::test]
    async fn staff_member_resolves_through_the_facade() {
        let warden = warden();
        let mut category = Category::new(GUILD, "support");
        category.staff_role_ids = vec![10];
        warden.create_category(category).await.expect("create");

        let tier = warden
            .resolve_privilege(Some(&member(2, &[10])))
            .await
            .expect("resolve");
        assert_eq!(tier, PrivilegeTier::GuildStaff);
    }

    #[tokio::test]
    async fn language_role_update_changes_resolution() {
        let warden = warden();
        let spanish_speaker = member(2, &[200]);

        assert_eq!(
            warden
                .resolve_locale(&spanish_speaker)
                .await
                .expect("before"),
            Locale::EnGb
        );

        warden
            .set_language_roles(GUILD, Some(100), Some(200))
            .await
            .expect("configure");

        assert_eq!(
            warden
                .resolve_locale(&spanish_speaker)
                .await
                .expect("after"),
            Locale::EsEs
        );
    }

    #[tokio::test]
    async fn mismatch_flows_through_category_and_settings() {
        let warden = warden();
        warden
            .set_language_roles(GUILD, Some(100), Some(200))
            .await
            .expect("configure");

        let category = Category::new(GUILD, "support");
        let id = warden.create_category(category).await.expect("create");
        warden
            .set_category_locale(id, Locale::EnGb)
            .await
            .expect("locale");

        let result = warden
            .detect_mismatch(&member(2, &[200]), id)
            .await
            .expect("detect");
        assert_eq!(result.user_locale, Some(Locale::EsEs));
        assert!(result.is_mismatch);
    }

    #[tokio::test]
    async fn unknown_category_is_a_typed_absence() {
        let warden = warden();
        let missing = ObjectId::new();

        let result = warden.detect_mismatch(&member(2, &[]), missing).await;
        assert!(matches!(result, Err(CoreError::CategoryNotFound(id)) if id == missing));
    }
}
