use bytes::Bytes;
use headers::HeaderMapExt;
use http::header::{HeaderName, HeaderValue};
use http::{HeaderMap, Request, Uri};
use tracing::warn;
use url::Url;

use super::error::{ApiClientError, EncodingError};
use super::parameters::{CallBody, CallParams, ParamLocation, escape_query_name};
use crate::operations::OperationDescriptor;
use crate::operations::descriptor::find_placeholder;

fn replace_path_param(path: &str, param_name: &str, value: &str) -> String {
    let pattern = ["{", param_name, "}"].concat();
    path.replace(&pattern, value)
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = [url.path(), "/"].concat();
        url.set_path(&path);
    }
    url
}

/// Parses the server URL, guaranteeing a trailing `/`.
///
/// Normalizing an already normalized URL is a no-op, so `https://h/api` and
/// `https://h/api/` give the same server.
///
/// # Errors
///
/// Returns [`ApiClientError::PathResolution`] if `server` is not an absolute URL
/// usable as a base.
pub fn normalize_server(server: &str) -> Result<Url, ApiClientError> {
    let url = Url::parse(server).map_err(|err| ApiClientError::PathResolution {
        url: server.to_string(),
        error: err.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ApiClientError::PathResolution {
            url: server.to_string(),
            error: "not a base URL".to_string(),
        });
    }
    Ok(with_trailing_slash(url))
}

/// Builds the request of an operation. No I/O happens here.
///
/// Path parameters are substituted in declaration order, query parameters
/// appended in declaration order, header parameters set as headers. The
/// operation path is resolved relative to `server`, so the server path prefix
/// is kept.
///
/// # Errors
///
/// - [`ApiClientError::Encoding`] if a parameter is missing or cannot be rendered
/// - [`ApiClientError::PathResolution`] if the expanded URL is not valid
pub fn build(
    server: &Url,
    descriptor: &OperationDescriptor,
    params: &CallParams,
    body: Option<CallBody>,
) -> Result<Request<Bytes>, ApiClientError> {
    let mut path = descriptor.path.to_string();
    let mut query = Vec::new();
    let mut headers = HeaderMap::new();

    for spec in descriptor.params {
        let Some(value) = params.get(spec.name)? else {
            if spec.required {
                return Err(EncodingError::MissingParameter {
                    name: spec.name.to_string(),
                    location: spec.location,
                }
                .into());
            }
            continue;
        };
        let encoded = spec.encode(value)?;
        match spec.location {
            ParamLocation::Path => path = replace_path_param(&path, spec.name, &encoded),
            ParamLocation::Query => {
                query.push([escape_query_name(spec.name), encoded].join("="));
            }
            ParamLocation::Header => {
                let invalid = |message: String| EncodingError::InvalidHeader {
                    name: spec.name.to_string(),
                    message,
                };
                let name = HeaderName::from_bytes(spec.name.as_bytes())
                    .map_err(|err| invalid(err.to_string()))?;
                let value =
                    HeaderValue::from_str(&encoded).map_err(|err| invalid(err.to_string()))?;
                headers.append(name, value);
            }
        }
    }

    for name in params.names() {
        if descriptor.params.iter().all(|spec| spec.name != name) {
            warn!(operation_id = descriptor.id, name, "ignoring undeclared parameter");
        }
    }

    if let Some(name) = find_placeholder(&path) {
        return Err(ApiClientError::PathResolution {
            url: path.clone(),
            error: format!("no value for placeholder '{name}'"),
        });
    }

    let server = with_trailing_slash(server.clone());
    let relative = [".", path.as_str()].concat();
    let mut url = server
        .join(&relative)
        .map_err(|err| ApiClientError::PathResolution {
            url: relative,
            error: err.to_string(),
        })?;
    if !query.is_empty() {
        url.set_query(Some(&query.join("&")));
    }
    let uri = url
        .as_str()
        .parse::<Uri>()
        .map_err(|err| ApiClientError::PathResolution {
            url: url.to_string(),
            error: err.to_string(),
        })?;

    let mut request = Request::new(Bytes::new());
    *request.method_mut() = descriptor.method.clone();
    *request.uri_mut() = uri;
    *request.headers_mut() = headers;
    if let Some(CallBody { content_type, data }) = body {
        request.headers_mut().typed_insert(content_type);
        *request.body_mut() = data;
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use http::Method;
    use http::header::CONTENT_TYPE;
    use rstest::rstest;

    use super::*;
    use crate::client::ParamSpec;

    const GET_APP: OperationDescriptor = OperationDescriptor::new(
        "getApp",
        Method::GET,
        "/app/{appId}",
        &[ParamSpec::path("appId")],
    );

    const SEARCH: OperationDescriptor = OperationDescriptor::new(
        "search",
        Method::GET,
        "/app/{appId}/logs",
        &[
            ParamSpec::path("appId"),
            ParamSpec::query("since"),
            ParamSpec::query("level"),
            ParamSpec::header("x-trace-id"),
        ],
    );

    fn server(url: &str) -> Url {
        normalize_server(url).expect("valid server")
    }

    #[rstest]
    #[case("https://api.runx.dev", "https://api.runx.dev/")]
    #[case("https://api.runx.dev/", "https://api.runx.dev/")]
    #[case("https://api.runx.dev/v1", "https://api.runx.dev/v1/")]
    #[case("https://api.runx.dev/v1/", "https://api.runx.dev/v1/")]
    fn should_normalize_server_with_one_trailing_slash(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        let once = normalize_server(input).expect("valid server");
        let twice = normalize_server(once.as_str()).expect("valid server");

        assert_eq!(once.as_str(), expected);
        assert_eq!(once, twice);
    }

    #[rstest]
    #[case::not_a_url("not a url")]
    #[case::relative("/api")]
    #[case::not_a_base("mailto:ops@runx.dev")]
    fn should_reject_invalid_server(#[case] input: &str) {
        let result = normalize_server(input);

        assert!(matches!(result, Err(ApiClientError::PathResolution { .. })));
    }

    #[rstest]
    #[case("https://api.runx.dev/v1")]
    #[case("https://api.runx.dev/v1/")]
    fn should_expand_path_relative_to_server(#[case] base: &str) {
        let params = CallParams::default().add_param("appId", "my-app");

        let request = build(&server(base), &GET_APP, &params, None).expect("should build");

        assert_eq!(request.method(), Method::GET);
        assert_eq!(
            request.uri().to_string(),
            "https://api.runx.dev/v1/app/my-app"
        );
    }

    #[test]
    fn should_escape_slash_in_path_parameter() {
        let params = CallParams::default().add_param("appId", "team/app?x=1");

        let request =
            build(&server("https://api.runx.dev"), &GET_APP, &params, None).expect("should build");

        insta::assert_snapshot!(request.uri().to_string(), @"https://api.runx.dev/app/team%2Fapp%3Fx%3D1");
    }

    #[test]
    fn should_not_double_substitute_placeholder_like_values() {
        let params = CallParams::default().add_param("appId", "{appId}");

        let request =
            build(&server("https://api.runx.dev"), &GET_APP, &params, None).expect("should build");

        assert_eq!(request.uri().path(), "/app/%7BappId%7D");
    }

    #[test]
    fn should_append_query_and_header_parameters() {
        let params = CallParams::default()
            .add_param("x-trace-id", "abc 123")
            .add_param("level", "warn,error")
            .add_param("appId", "web")
            .add_param("since", "2024-01-01T00:00:00Z");

        let request =
            build(&server("http://localhost:8080"), &SEARCH, &params, None).expect("should build");

        insta::assert_snapshot!(
            request.uri().to_string(),
            @"http://localhost:8080/app/web/logs?since=2024-01-01T00:00:00Z&level=warn,error"
        );
        assert_eq!(
            request.headers().get("x-trace-id"),
            Some(&HeaderValue::from_static("abc 123"))
        );
    }

    #[test]
    fn should_skip_absent_optional_parameters() {
        let params = CallParams::default().add_param("appId", "web");

        let request =
            build(&server("http://localhost"), &SEARCH, &params, None).expect("should build");

        assert_eq!(request.uri().query(), None);
        assert!(request.headers().is_empty());
    }

    #[test]
    fn should_fail_on_missing_required_parameter() {
        let error = build(
            &server("http://localhost"),
            &GET_APP,
            &CallParams::default(),
            None,
        )
        .expect_err("appId is required");

        insta::assert_snapshot!(error.to_string(), @"Invalid parameter: missing required path parameter 'appId'");
    }

    #[test]
    fn should_fail_on_unresolved_placeholder() {
        const BROKEN: OperationDescriptor =
            OperationDescriptor::new("broken", Method::GET, "/app/{appId}", &[]);

        let error = build(
            &server("http://localhost"),
            &BROKEN,
            &CallParams::default(),
            None,
        )
        .expect_err("placeholder is not declared");

        assert!(matches!(error, ApiClientError::PathResolution { .. }));
    }

    #[test]
    fn should_fail_on_invalid_header_value() {
        let params = CallParams::default()
            .add_param("appId", "web")
            .add_param("x-trace-id", "line\nbreak");

        let error = build(&server("http://localhost"), &SEARCH, &params, None)
            .expect_err("newline is not allowed in headers");

        assert!(matches!(
            error,
            ApiClientError::Encoding(EncodingError::InvalidHeader { .. })
        ));
    }

    #[test]
    fn should_set_body_and_content_type() {
        let params = CallParams::default().add_param("appId", "web");
        let body = CallBody::json(&serde_json::json!({"name": "web"})).expect("valid json");

        let request = build(&server("http://localhost"), &GET_APP, &params, Some(body))
            .expect("should build");

        assert_eq!(
            request.headers().get(CONTENT_TYPE),
            Some(&HeaderValue::from_static("application/json"))
        );
        assert_eq!(request.body().as_ref(), br#"{"name":"web"}"#);
    }

    #[test]
    fn should_ignore_undeclared_parameters() {
        let params = CallParams::default()
            .add_param("appId", "web")
            .add_param("unknown", "value");

        let request =
            build(&server("http://localhost"), &GET_APP, &params, None).expect("should build");

        assert_eq!(request.uri().to_string(), "http://localhost/app/web");
    }
}
