use std::sync::Arc;
use uuid::Uuid;

use crate::clock::Clock;
use crate::credentials::PasswordHasher;
use crate::db::{Collection, Store, StoreExt};
use crate::error::{AppError, AppResult};
use crate::models::{ApprovalStatus, NewUser, User, UserRecord};
use crate::notifications::NotificationCenter;

/// User accounts and the approval workflow over the `users` collection.
///
/// ```text
/// pending --approve--> approved
/// pending --reject---> rejected
/// ```
///
/// Approving or rejecting also clears the matching `user_registration`
/// notification.
#[derive(Clone)]
pub struct UserDirectory {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    hasher: Arc<dyn PasswordHasher>,
    notifications: NotificationCenter,
}

impl UserDirectory {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            notifications: NotificationCenter::new(store.clone(), clock.clone()),
            store,
            clock,
            hasher,
        }
    }

    pub fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.records()?.into_iter().map(|r| r.user).collect())
    }

    pub fn get(&self, id: Uuid) -> AppResult<User> {
        self.list()?
            .into_iter()
            .find(|u| u.id == id)
            .ok_or_else(|| AppError::not_found("user", id))
    }

    /// Admin-issued account creation: the user starts out approved.
    pub fn create(&self, new_user: NewUser) -> AppResult<User> {
        let mut errors = Vec::new();
        if new_user.email.trim().is_empty() || new_user.name.trim().is_empty() {
            errors.push("Todos los campos son requeridos".to_string());
        }
        if new_user.password.chars().count() < 6 {
            errors.push("La contraseña debe tener al menos 6 caracteres".to_string());
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let mut records = self.records()?;
        if records.iter().any(|r| r.user.email == new_user.email) {
            return Err(AppError::DuplicateEmail(new_user.email));
        }

        let record = UserRecord {
            user: User {
                id: Uuid::new_v4(),
                email: new_user.email,
                name: new_user.name,
                role: new_user.role,
                status: ApprovalStatus::Approved,
                created_at: self.clock.now(),
                approved_by: None,
                approved_at: None,
            },
            password_hash: self.hasher.hash(&new_user.password)?,
        };
        let user = record.user.clone();
        records.push(record);
        self.store.save(Collection::Users, &records)?;

        tracing::info!(user_id = %user.id, role = ?user.role, "User created");
        Ok(user)
    }

    /// Checks credentials and sign-in eligibility. Every failure looks the same.
    pub fn authenticate(&self, email: &str, password: &str) -> AppResult<User> {
        let records = self.records()?;
        let user = records
            .into_iter()
            .find(|r| r.user.email == email && self.hasher.verify(password, &r.password_hash))
            .map(|r| r.user)
            .filter(User::can_sign_in);

        match user {
            Some(user) => {
                tracing::info!(user_id = %user.id, "User signed in");
                Ok(user)
            }
            None => {
                tracing::warn!("Sign-in rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    pub fn approve(&self, user_id: Uuid, approver_id: Uuid) -> AppResult<User> {
        let now = self.clock.now();
        let user = self.transition(user_id, |user| {
            user.status = ApprovalStatus::Approved;
            user.approved_by = Some(approver_id);
            user.approved_at = Some(now);
        })?;

        self.notifications.dismiss_registration(user_id)?;
        tracing::info!(%user_id, %approver_id, "User approved");
        Ok(user)
    }

    pub fn reject(&self, user_id: Uuid) -> AppResult<User> {
        let user = self.transition(user_id, |user| {
            user.status = ApprovalStatus::Rejected;
        })?;

        self.notifications.dismiss_registration(user_id)?;
        tracing::info!(%user_id, "User rejected");
        Ok(user)
    }

    /// Removes the account. Past orders are kept.
    pub fn delete(&self, user_id: Uuid) -> AppResult<()> {
        let mut records = self.records()?;
        let before = records.len();
        records.retain(|r| r.user.id != user_id);

        if records.len() != before {
            self.store.save(Collection::Users, &records)?;
            tracing::info!(%user_id, "User deleted");
        }
        Ok(())
    }

    fn transition(&self, user_id: Uuid, apply: impl FnOnce(&mut User)) -> AppResult<User> {
        let mut records = self.records()?;
        let record = records
            .iter_mut()
            .find(|r| r.user.id == user_id)
            .ok_or_else(|| AppError::not_found("user", user_id))?;

        if record.user.status != ApprovalStatus::Pending {
            tracing::debug!(%user_id, status = ?record.user.status, "Re-deciding a settled user");
        }
        apply(&mut record.user);
        let user = record.user.clone();

        self.store.save(Collection::Users, &records)?;
        Ok(user)
    }

    fn records(&self) -> AppResult<Vec<UserRecord>> {
        Ok(self.store.load(Collection::Users)?)
    }
}
