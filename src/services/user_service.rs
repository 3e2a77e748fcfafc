use crate::models::{
    auth_token::PlainTextToken,
    user::{NewUser, User},
};
use crate::repositories::{RepositoryError, UserRepository};
use crate::services::auth_token_service::{AuthTokenError, AuthTokenService, DEFAULT_TOKEN_NAME};
use crate::services::avatar_store::{detect_image_extension, AvatarStore, StorageError};
use crate::validation::{self, ValidationErrors};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("{0}")]
    Validation(ValidationErrors),
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Avatar storage failed: {0}")]
    StorageError(#[from] StorageError),
    #[error("Token error: {0}")]
    TokenError(#[from] AuthTokenError),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

/// An uploaded avatar as received from the client.
/// The file type is sniffed from `bytes`, never taken from the client.
#[derive(Debug, Clone, Default)]
pub struct AvatarUpload {
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub image: Option<AvatarUpload>,
}

#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub user: User,
    pub auth_token: PlainTextToken,
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
    avatars: Arc<dyn AvatarStore>,
    token_service: Arc<AuthTokenService>,
}

impl UserService {
    pub fn new(
        repository: Arc<dyn UserRepository>,
        avatars: Arc<dyn AvatarStore>,
        token_service: Arc<AuthTokenService>,
    ) -> Self {
        Self {
            repository,
            avatars,
            token_service,
        }
    }

    pub async fn signup(&self, request: SignupRequest) -> Result<SignupOutcome, UserServiceError> {
        let mut errors = ValidationErrors::new();

        let name = validation::required_str(&mut errors, "name", request.name.as_deref());
        let email = validation::required_str(&mut errors, "email", request.email.as_deref())
            .map(str::trim)
            .filter(|email| validation::email(&mut errors, "email", email));
        let password =
            validation::required_str(&mut errors, "password", request.password.as_deref());
        let image_extension = match request.image.as_ref() {
            Some(upload) if !upload.bytes.is_empty() => {
                let extension = detect_image_extension(&upload.bytes);
                if extension.is_none() {
                    errors.add("image", "The image must be an image.");
                }
                extension
            }
            _ => {
                errors.add("image", validation::required_message("image"));
                None
            }
        };

        if let Some(email) = email {
            if self.repository.find_by_email(email).await?.is_some() {
                errors.add("email", email_taken_message());
            }
        }

        let (name, email, password, extension, upload) =
            match (name, email, password, image_extension, request.image.as_ref()) {
                (Some(name), Some(email), Some(password), Some(extension), Some(upload))
                    if errors.is_empty() =>
                {
                    (name, email, password, extension, upload)
                }
                _ => return Err(UserServiceError::Validation(errors)),
            };

        let password_hash = hash_password(password)?;
        let image = self.avatars.store(&upload.bytes, extension).await?;

        let new_user = NewUser::new(name.trim(), email, password_hash, image.clone());
        let user = match self.repository.create_user(&new_user).await {
            Ok(user) => user,
            Err(err) => {
                if let Err(e) = self.avatars.delete(&image).await {
                    tracing::warn!("Failed to remove orphaned avatar {}: {}", image, e);
                }
                return Err(match err {
                    RepositoryError::AlreadyExists => UserServiceError::Validation(
                        ValidationErrors::single("email", email_taken_message()),
                    ),
                    other => UserServiceError::RepositoryError(other),
                });
            }
        };

        let auth_token = self
            .token_service
            .issue_token(user.id, DEFAULT_TOKEN_NAME)
            .await?;

        tracing::info!("User {} signed up", user.id);
        Ok(SignupOutcome { user, auth_token })
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_email(email).await?)
    }

    pub async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<User>, UserServiceError> {
        Ok(self.repository.list_users(limit, offset).await?)
    }

    /// Issue an additional token for an existing user
    pub async fn issue_token(&self, user: &User) -> Result<PlainTextToken, UserServiceError> {
        Ok(self
            .token_service
            .issue_token(user.id, DEFAULT_TOKEN_NAME)
            .await?)
    }
}

fn email_taken_message() -> &'static str {
    "The email has already been taken."
}

pub fn hash_password(password: &str) -> Result<String, UserServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| UserServiceError::HashingError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::token_repository::MockTokenRepository;
    use crate::repositories::user_repository::MockUserRepository;
    use crate::services::auth_service::verify_password;
    use crate::services::avatar_store::MockAvatarStore;
    use crate::test_utils::test_helpers;
    use chrono::Utc;
    use mockall::predicate::*;

    fn service(
        users: MockUserRepository,
        avatars: MockAvatarStore,
        tokens: MockTokenRepository,
    ) -> UserService {
        let token_service = Arc::new(AuthTokenService::new(Arc::new(tokens), None));
        UserService::new(Arc::new(users), Arc::new(avatars), token_service)
    }

    fn valid_request() -> SignupRequest {
        SignupRequest {
            name: Some("Doe".to_string()),
            email: Some("test@example.com".to_string()),
            password: Some("P$$wef22".to_string()),
            image: Some(AvatarUpload::new(
                test_helpers::sample_png().expect("png encodes"),
            )),
        }
    }

    #[tokio::test]
    async fn test_signup_success() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .with(eq("test@example.com"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(None) }));
        users
            .expect_create_user()
            .withf(|new_user| {
                new_user.email == "test@example.com"
                    && new_user.image == "avatars/abc.png"
                    && verify_password("P$$wef22", &new_user.password_hash)
            })
            .times(1)
            .returning(|new_user| {
                let now = Utc::now();
                let user = User {
                    id: 1,
                    name: new_user.name.clone(),
                    email: new_user.email.clone(),
                    email_verified_at: None,
                    password_hash: new_user.password_hash.clone(),
                    image: new_user.image.clone(),
                    created_at: now,
                    updated_at: now,
                };
                Box::pin(async move { Ok(user) })
            });

        let mut avatars = MockAvatarStore::new();
        avatars
            .expect_store()
            .withf(|_, extension| extension == "png")
            .times(1)
            .returning(|_, _| Box::pin(async move { Ok("avatars/abc.png".to_string()) }));

        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_create_token()
            .times(1)
            .returning(|_, _, _, _| Box::pin(async move { Ok(1) }));

        let service = service(users, avatars, tokens);

        let outcome = service.signup(valid_request()).await.expect("signup");
        assert_eq!(outcome.user.email, "test@example.com");
        assert_eq!(outcome.user.image, "avatars/abc.png");
        assert_eq!(outcome.auth_token.token_id, 1);
    }

    #[tokio::test]
    async fn test_signup_missing_fields() {
        let service = service(
            MockUserRepository::new(),
            MockAvatarStore::new(),
            MockTokenRepository::new(),
        );

        let result = service.signup(SignupRequest::default()).await;
        match result {
            Err(UserServiceError::Validation(errors)) => {
                for field in ["name", "email", "password", "image"] {
                    assert!(errors.has(field), "missing error for {}", field);
                }
                assert_eq!(errors.messages("image"), ["The image field is required."]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signup_rejects_non_image_upload() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Box::pin(async move { Ok(None) }));

        let service = service(users, MockAvatarStore::new(), MockTokenRepository::new());

        let mut request = valid_request();
        request.image = Some(AvatarUpload::new(b"%PDF-1.4 not an image".to_vec()));

        let result = service.signup(request).await;
        match result {
            Err(UserServiceError::Validation(errors)) => {
                assert_eq!(errors.messages("image"), ["The image must be an image."]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signup_email_taken() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_email().times(1).returning(|email| {
            let now = Utc::now();
            let user = User {
                id: 3,
                name: "Existing".to_string(),
                email: email.to_string(),
                email_verified_at: None,
                password_hash: "hash".to_string(),
                image: "avatars/x.png".to_string(),
                created_at: now,
                updated_at: now,
            };
            Box::pin(async move { Ok(Some(user)) })
        });

        let service = service(users, MockAvatarStore::new(), MockTokenRepository::new());

        let result = service.signup(valid_request()).await;
        match result {
            Err(UserServiceError::Validation(errors)) => {
                assert_eq!(
                    errors.messages("email"),
                    ["The email has already been taken."]
                );
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signup_removes_avatar_when_insert_races() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_email()
            .returning(|_| Box::pin(async move { Ok(None) }));
        users
            .expect_create_user()
            .times(1)
            .returning(|_| Box::pin(async move { Err(RepositoryError::AlreadyExists) }));

        let mut avatars = MockAvatarStore::new();
        avatars
            .expect_store()
            .returning(|_, _| Box::pin(async move { Ok("avatars/race.png".to_string()) }));
        avatars
            .expect_delete()
            .with(eq("avatars/race.png"))
            .times(1)
            .returning(|_| Box::pin(async move { Ok(()) }));

        let service = service(users, avatars, MockTokenRepository::new());

        let result = service.signup(valid_request()).await;
        assert!(matches!(result, Err(UserServiceError::Validation(_))));
    }
}
