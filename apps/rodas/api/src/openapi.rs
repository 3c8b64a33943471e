use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Registers the `bearer_auth` scheme referenced by protected operations.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Rodas de Conversa API",
        version = "0.1.0",
        description = "Conversation circles organized across Ceará: registration, scheduling, map and closure records"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/rodas", api = domain_rodas::ApiDoc),
        (path = "/faixas-etarias", api = domain_rodas::AgeBracketsApiDoc),
        (path = "/multiplicadores", api = domain_organizers::RegistrationApiDoc),
        (path = "/auth", api = domain_organizers::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_nests_every_domain() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        for expected in [
            "/rodas",
            "/rodas/{id}/encerrar",
            "/rodas/estatisticas",
            "/faixas-etarias",
            "/multiplicadores",
            "/auth/login",
            "/auth/me",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}: {paths:?}");
        }
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
