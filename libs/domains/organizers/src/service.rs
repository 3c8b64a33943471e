use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::JwtAuth;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{OrganizerError, OrganizerResult};
use crate::models::{AuthResponse, NewOrganizer, Organizer, RegisterOrganizer, normalize_cpf};
use crate::repository::OrganizerRepository;

/// Registration, login and profile lookup for organizers
pub struct OrganizerService<R: OrganizerRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
}

impl<R: OrganizerRepository> Clone for OrganizerService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            auth: self.auth.clone(),
        }
    }
}

impl<R: OrganizerRepository> OrganizerService<R> {
    pub fn new(repository: R, auth: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            auth,
        }
    }

    /// Store a new organizer and issue their first token
    pub async fn register(&self, input: RegisterOrganizer) -> OrganizerResult<AuthResponse> {
        let cpf = normalize_cpf(&input.cpf)?;

        if self.repository.find_by_cpf(&cpf).await?.is_some() {
            return Err(OrganizerError::DuplicateCpf);
        }

        let password_hash = hash_password(&input.password)?;

        let organizer = self
            .repository
            .create(NewOrganizer {
                name: input.name.trim().to_string(),
                cpf,
                email: input.email.trim().to_lowercase(),
                password_hash,
                gender: input.gender.filter(|g| !g.trim().is_empty()),
                state: input.state.to_uppercase(),
                municipality: input.municipality.trim().to_string(),
                profession: input.profession.trim().to_string(),
                phone: input.phone.trim().to_string(),
            })
            .await?;

        self.issue(organizer)
    }

    /// Check cpf + password. Unknown cpf and wrong password fail the same way.
    pub async fn login(&self, cpf: &str, password: &str) -> OrganizerResult<AuthResponse> {
        let cpf = normalize_cpf(cpf).map_err(|_| OrganizerError::InvalidCredentials)?;

        let organizer = self
            .repository
            .find_by_cpf(&cpf)
            .await?
            .ok_or(OrganizerError::InvalidCredentials)?;

        if !verify_password(password, &organizer.password_hash)? {
            tracing::info!(organizer_id = %organizer.id, "Login rejected: wrong password");
            return Err(OrganizerError::InvalidCredentials);
        }

        self.issue(organizer)
    }

    pub async fn profile(&self, organizer_id: Uuid) -> OrganizerResult<Organizer> {
        self.repository
            .find_by_id(organizer_id)
            .await?
            .ok_or(OrganizerError::NotFound(organizer_id))
    }

    /// Lifetime of issued tokens, also used as the cookie `Max-Age`.
    pub fn token_ttl_secs(&self) -> i64 {
        self.auth.ttl_secs()
    }

    fn issue(&self, organizer: Organizer) -> OrganizerResult<AuthResponse> {
        let token = self
            .auth
            .create_token(organizer.id, &organizer.cpf)
            .map_err(|e| OrganizerError::Token(e.to_string()))?;

        Ok(AuthResponse {
            token,
            organizer: organizer.into(),
        })
    }
}

fn hash_password(password: &str) -> OrganizerResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| OrganizerError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> OrganizerResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| OrganizerError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryOrganizerRepository, MockOrganizerRepository};
    use axum_helpers::JwtConfig;

    const SECRET: &str = "rodas-de-conversa-test-secret-0123456789";

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new(SECRET))
    }

    fn form(cpf: &str, email: &str) -> RegisterOrganizer {
        RegisterOrganizer {
            name: " Ana Souza ".into(),
            gender: Some("".into()),
            cpf: cpf.into(),
            email: email.into(),
            password: "segredo1".into(),
            state: "ce".into(),
            municipality: "Fortaleza".into(),
            profession: "Professora".into(),
            phone: "85999990000".into(),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("segredo1").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("segredo1", &hash).unwrap());
        assert!(!verify_password("segredo2", &hash).unwrap());
    }

    #[test]
    fn test_verify_against_garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("segredo1", "not-a-phc-string"),
            Err(OrganizerError::PasswordHash(_))
        ));
    }

    #[tokio::test]
    async fn test_register_normalizes_and_issues_token() {
        let service = OrganizerService::new(InMemoryOrganizerRepository::new(), auth());

        let response = service
            .register(form("123.456.789-01", "Ana@Example.com"))
            .await
            .unwrap();

        assert_eq!(response.organizer.cpf, "12345678901");
        assert_eq!(response.organizer.email, "ana@example.com");
        assert_eq!(response.organizer.name, "Ana Souza");
        assert_eq!(response.organizer.state, "CE");
        assert!(response.organizer.gender.is_none());

        let claims = auth().verify_token(&response.token).unwrap();
        assert_eq!(claims.organizer_id(), Some(response.organizer.id));
        assert_eq!(claims.cpf, "12345678901");
    }

    #[tokio::test]
    async fn test_register_rejects_duplicates() {
        let service = OrganizerService::new(InMemoryOrganizerRepository::new(), auth());
        service
            .register(form("12345678901", "ana@example.com"))
            .await
            .unwrap();

        let same_cpf = service.register(form("123.456.789-01", "bia@example.com")).await;
        assert!(matches!(same_cpf, Err(OrganizerError::DuplicateCpf)));

        let same_email = service.register(form("10987654321", "ANA@example.com")).await;
        assert!(matches!(same_email, Err(OrganizerError::DuplicateEmail)));
    }

    #[tokio::test]
    async fn test_register_with_bad_cpf_never_touches_store() {
        let mut mock = MockOrganizerRepository::new();
        mock.expect_find_by_cpf().never();
        mock.expect_create().never();
        let service = OrganizerService::new(mock, auth());

        let result = service.register(form("123", "ana@example.com")).await;

        assert!(matches!(result, Err(OrganizerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login() {
        let service = OrganizerService::new(InMemoryOrganizerRepository::new(), auth());
        let registered = service
            .register(form("12345678901", "ana@example.com"))
            .await
            .unwrap();

        let logged_in = service.login("123.456.789-01", "segredo1").await.unwrap();
        assert_eq!(logged_in.organizer.id, registered.organizer.id);

        for (cpf, password) in [
            ("12345678901", "errada"),
            ("10987654321", "segredo1"),
            ("abc", "segredo1"),
        ] {
            let result = service.login(cpf, password).await;
            assert!(
                matches!(result, Err(OrganizerError::InvalidCredentials)),
                "{cpf}/{password} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn test_profile_of_unknown_organizer() {
        let service = OrganizerService::new(InMemoryOrganizerRepository::new(), auth());
        let id = Uuid::now_v7();

        let result = service.profile(id).await;

        assert!(matches!(result, Err(OrganizerError::NotFound(missing)) if missing == id));
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_persistence() {
        let mut mock = MockOrganizerRepository::new();
        mock.expect_find_by_cpf()
            .returning(|_| Err(OrganizerError::Persistence("connection reset".into())));
        let service = OrganizerService::new(mock, auth());

        let result = service.login("12345678901", "segredo1").await;

        assert!(matches!(result, Err(OrganizerError::Persistence(_))));
    }
}
