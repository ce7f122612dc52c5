//! Auth service: registration, login, and token authentication.
//!
//! This is the single authorization component: both the route-level
//! extractor and anything cross-cutting go through
//! [`AuthService::authenticate`], so there is exactly one error shape.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use leadgate_types::error::{AuthError, RepositoryError};
use leadgate_types::user::{
    Principal, RegisterRequest, TokenResponse, User, UserSummary,
};

use crate::auth::password::PasswordHasher;
use crate::auth::token::TokenService;
use crate::repository::user::UserRepository;

/// Orchestrates credential verification and token lifecycle over a user
/// store.
///
/// Generic over the repository, hasher, and token service traits so the
/// core crate never depends on infra.
pub struct AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    users: U,
    hasher: H,
    tokens: T,
    // Serializes registrations so the first-user check and the insert are
    // one atomic step.
    register_gate: tokio::sync::Mutex<()>,
}

impl<U, H, T> AuthService<U, H, T>
where
    U: UserRepository,
    H: PasswordHasher,
    T: TokenService,
{
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
            register_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Register a new user.
    ///
    /// Enforces unique email and handle. The first user ever registered is
    /// auto-granted the admin and key-user flags; registrations run under a
    /// gate so two concurrent first registrations cannot both win the grant.
    pub async fn register(&self, req: RegisterRequest) -> Result<TokenResponse, AuthError> {
        let _gate = self.register_gate.lock().await;

        if self
            .users
            .find_by_email(&req.email)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(AuthError::DuplicateEmail(req.email));
        }
        if self
            .users
            .find_by_identifier(&req.handle)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(AuthError::DuplicateHandle(req.handle));
        }

        let is_first = self.users.count().await.map_err(storage)? == 0;

        let user = User {
            id: Uuid::now_v7(),
            name: req.name,
            handle: req.handle,
            email: req.email,
            password_hash: self.hasher.hash(&req.password)?,
            is_active: true,
            is_admin: is_first,
            is_key_user: is_first,
            created_at: Utc::now(),
        };

        self.users.create(&user).await.map_err(|e| match e {
            RepositoryError::Conflict(msg) => AuthError::DuplicateEmail(msg),
            other => storage(other),
        })?;

        info!(user_id = %user.id, first_user = is_first, "User registered");

        let token = self.tokens.issue(&user.email)?;
        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user: user.summary(),
        })
    }

    /// Log a user in by email or handle.
    ///
    /// Rejects unknown identifiers and wrong passwords with the same
    /// `InvalidCredentials` error; rejects inactive users with `Inactive`.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self
            .users
            .find_by_identifier(identifier)
            .await
            .map_err(storage)?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }
        if !user.is_active {
            return Err(AuthError::Inactive);
        }

        let token = self.tokens.issue(&user.email)?;
        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user: user.summary(),
        })
    }

    /// Resolve a bearer token to the calling principal.
    ///
    /// Fails with `InvalidToken`/`Expired` from the token layer and with
    /// `UnknownSubject` when the embedded subject resolves to no user.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let claims = self.tokens.decode(token)?;

        let user = self
            .users
            .find_by_email(&claims.sub)
            .await
            .map_err(storage)?
            .ok_or(AuthError::UnknownSubject)?;

        Ok(Principal {
            user_id: user.id,
            email: user.email,
            is_admin: user.is_admin,
            is_key_user: user.is_key_user,
        })
    }

    /// List all users.
    pub async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError> {
        let users = self.users.list().await.map_err(storage)?;
        Ok(users.iter().map(User::summary).collect())
    }

    /// Toggle a user's active flag.
    ///
    /// A key user can never be deactivated.
    pub async fn set_user_active(
        &self,
        id: &Uuid,
        is_active: bool,
    ) -> Result<UserSummary, AuthError> {
        let user = self
            .users
            .get(id)
            .await
            .map_err(storage)?
            .ok_or(AuthError::UnknownSubject)?;

        if user.is_key_user && !is_active {
            return Err(AuthError::KeyUserProtected);
        }

        self.users
            .set_active(id, is_active)
            .await
            .map_err(storage)?;

        let mut summary = user.summary();
        summary.is_active = is_active;
        Ok(summary)
    }
}

fn storage(e: RepositoryError) -> AuthError {
    AuthError::Storage(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::Claims;
    use std::sync::Mutex;

    /// In-memory user store for service tests.
    #[derive(Default)]
    struct MemoryUsers {
        users: Mutex<Vec<User>>,
    }

    impl UserRepository for MemoryUsers {
        async fn create(&self, user: &User) -> Result<(), RepositoryError> {
            let mut users = self.users.lock().unwrap();
            if users.iter().any(|u| u.email == user.email) {
                return Err(RepositoryError::Conflict(user.email.clone()));
            }
            users.push(user.clone());
            Ok(())
        }

        async fn get(&self, id: &Uuid) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.lock().unwrap().iter().find(|u| &u.id == id).cloned())
        }

        async fn find_by_identifier(
            &self,
            identifier: &str,
        ) -> Result<Option<User>, RepositoryError> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == identifier || u.handle == identifier)
                .cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn list(&self) -> Result<Vec<User>, RepositoryError> {
            Ok(self.users.lock().unwrap().clone())
        }

        async fn count(&self) -> Result<u64, RepositoryError> {
            Ok(self.users.lock().unwrap().len() as u64)
        }

        async fn set_active(&self, id: &Uuid, is_active: bool) -> Result<(), RepositoryError> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| &u.id == id)
                .ok_or(RepositoryError::NotFound)?;
            user.is_active = is_active;
            Ok(())
        }
    }

    /// Reversible fake hasher -- tests never need real argon2.
    struct FakeHasher;

    impl PasswordHasher for FakeHasher {
        fn hash(&self, plain: &str) -> Result<String, AuthError> {
            Ok(format!("hashed:{plain}"))
        }

        fn verify(&self, plain: &str, phc: &str) -> bool {
            phc == format!("hashed:{plain}")
        }
    }

    /// Token service that encodes the subject directly.
    struct FakeTokens;

    impl TokenService for FakeTokens {
        fn issue(&self, subject: &str) -> Result<String, AuthError> {
            Ok(format!("token:{subject}"))
        }

        fn decode(&self, token: &str) -> Result<Claims, AuthError> {
            let sub = token
                .strip_prefix("token:")
                .ok_or(AuthError::InvalidToken)?;
            Ok(Claims {
                sub: sub.to_string(),
                exp: 0,
            })
        }
    }

    fn service() -> AuthService<MemoryUsers, FakeHasher, FakeTokens> {
        AuthService::new(MemoryUsers::default(), FakeHasher, FakeTokens)
    }

    fn register_req(name: &str, handle: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            handle: handle.to_string(),
            email: email.to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_user_gets_admin_and_key_flags() {
        let svc = service();
        let first = svc
            .register(register_req("Ana", "ana", "ana@example.com"))
            .await
            .unwrap();
        assert!(first.user.is_admin);
        assert!(first.user.is_key_user);

        let second = svc
            .register(register_req("Bia", "bia", "bia@example.com"))
            .await
            .unwrap();
        assert!(!second.user.is_admin);
        assert!(!second.user.is_key_user);
    }

    #[tokio::test]
    async fn test_concurrent_registrations_grant_one_first_user() {
        let svc = service();
        let (a, b) = tokio::join!(
            svc.register(register_req("Ana", "ana", "ana@example.com")),
            svc.register(register_req("Bia", "bia", "bia@example.com")),
        );
        let a = a.unwrap();
        let b = b.unwrap();

        let firsts = [&a, &b]
            .iter()
            .filter(|r| r.user.is_admin && r.user.is_key_user)
            .count();
        assert_eq!(firsts, 1, "exactly one registration wins the first-user grant");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let svc = service();
        svc.register(register_req("Ana", "ana", "ana@example.com"))
            .await
            .unwrap();
        let err = svc
            .register(register_req("Other", "other", "ana@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn test_duplicate_handle_rejected() {
        let svc = service();
        svc.register(register_req("Ana", "ana", "ana@example.com"))
            .await
            .unwrap();
        let err = svc
            .register(register_req("Other", "ana", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateHandle(_)));
    }

    #[tokio::test]
    async fn test_login_by_email_and_handle() {
        let svc = service();
        svc.register(register_req("Ana", "ana", "ana@example.com"))
            .await
            .unwrap();

        assert!(svc.login("ana@example.com", "s3cret").await.is_ok());
        assert!(svc.login("ana", "s3cret").await.is_ok());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let svc = service();
        svc.register(register_req("Ana", "ana", "ana@example.com"))
            .await
            .unwrap();
        let err = svc.login("ana", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_inactive_user_cannot_login() {
        let svc = service();
        svc.register(register_req("Ana", "ana", "ana@example.com"))
            .await
            .unwrap();
        // Second user is not a key user, so it can be deactivated.
        let resp = svc
            .register(register_req("Bia", "bia", "bia@example.com"))
            .await
            .unwrap();
        svc.set_user_active(&resp.user.id, false).await.unwrap();

        let err = svc.login("bia", "s3cret").await.unwrap_err();
        assert!(matches!(err, AuthError::Inactive));
    }

    #[tokio::test]
    async fn test_key_user_cannot_be_deactivated() {
        let svc = service();
        let first = svc
            .register(register_req("Ana", "ana", "ana@example.com"))
            .await
            .unwrap();
        let err = svc
            .set_user_active(&first.user.id, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::KeyUserProtected));
    }

    #[tokio::test]
    async fn test_authenticate_resolves_principal() {
        let svc = service();
        let resp = svc
            .register(register_req("Ana", "ana", "ana@example.com"))
            .await
            .unwrap();

        let principal = svc.authenticate(&resp.access_token).await.unwrap();
        assert_eq!(principal.email, "ana@example.com");
        assert!(principal.is_admin);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_subject() {
        let svc = service();
        let err = svc.authenticate("token:ghost@example.com").await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownSubject));
    }

    #[tokio::test]
    async fn test_authenticate_garbage_token() {
        let svc = service();
        let err = svc.authenticate("not-a-token").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }
}
