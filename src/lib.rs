//! # Guardia
//!
//! `guardia` is a webhook token-authentication service for Kubernetes API
//! servers. The API server is configured with this service as its
//! [webhook token authenticator]: every bearer token presented by a client is
//! wrapped in a `TokenReview` envelope and POSTed to `/authenticate`. Guardia
//! verifies the token signature, then answers with the username and the group
//! list the cluster should bind RBAC policies against.
//!
//! Groups are derived from the token claims in a fixed order: a base group
//! shared by every authenticated user, one `<namespace>-<role>` group per
//! authorization entry, and a cluster-admin group when the token carries the
//! admin flag.
//!
//! The webhook contract is binary: a request either authenticates or it does
//! not. Unreadable or unparsable review bodies therefore degrade to a `401`
//! response rather than a distinct error status, and every request is answered
//! and metered no matter which path it takes.
//!
//! [webhook token authenticator]: https://kubernetes.io/docs/reference/access-authn-authz/authentication/#webhook-token-authentication

pub mod cli;
pub mod guardia;
