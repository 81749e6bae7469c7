//! One-time OAuth consent flow

use crate::config::{Config, REDIRECT_PORT};
use anyhow::{Context, Result};
use bytes::Bytes;
use core_auth::TokenFileStore;
use http_body_util::Full;
use hyper::{body::Incoming, service::service_fn, Request, Response};
use hyper_util::rt::TokioIo;

pub async fn run(config: &Config) -> Result<()> {
    let http = reqwest::Client::new();
    let flow = config.oauth_flow(http);

    let authorize_url = flow.authorize_url()?;
    println!("Starting OAuth 2.0 authentication flow...\n");
    println!("Open this URL in your browser to authorize:\n\n{}\n", authorize_url);
    println!(
        "Waiting for authorization on http://localhost:{}...",
        REDIRECT_PORT
    );

    let code = wait_for_auth_code(REDIRECT_PORT).await?;

    println!("\nExchanging authorization code for tokens...");
    let tokens = flow.exchange_code(&code).await?;
    TokenFileStore::new(config.tokens_path()).save(&tokens).await?;

    println!("\nAuthentication complete!");
    Ok(())
}

/// Serve the OAuth redirect until a request carrying an authorization code
/// arrives. Unrelated requests (favicon probes) get the failure page and
/// the listener keeps waiting.
async fn wait_for_auth_code(port: u16) -> Result<String> {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("bind OAuth callback listener on port {}", port))?;

    let (tx, mut rx) = tokio::sync::mpsc::channel::<String>(1);

    loop {
        tokio::select! {
            code = rx.recv() => {
                return code.context("callback channel closed before a code arrived");
            }
            accepted = listener.accept() => {
                let (conn, _) = accepted.context("accept OAuth callback connection")?;
                let tx = tx.clone();
                tokio::spawn(async move {
                    let service = service_fn(move |request: Request<Incoming>| {
                        let tx = tx.clone();
                        async move {
                            let query = request.uri().query().unwrap_or("");
                            let mut code = None;
                            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                                if key == "code" {
                                    code = Some(value.into_owned());
                                }
                            }

                            let body = match code {
                                Some(code) => {
                                    let _ = tx.send(code).await;
                                    "<h1>Authorization successful!</h1>\
                                     <p>You can close this window and return to the terminal.</p>"
                                }
                                None => {
                                    "<h1>Authorization failed</h1>\
                                     <p>You can close this window.</p>"
                                }
                            };
                            Ok::<_, std::convert::Infallible>(Response::new(Full::new(
                                Bytes::from(body),
                            )))
                        }
                    });

                    let io = TokioIo::new(conn);
                    if let Err(e) = hyper::server::conn::http1::Builder::new()
                        .serve_connection(io, service)
                        .await
                    {
                        tracing::debug!(error = %e, "OAuth callback connection error");
                    }
                });
            }
        }
    }
}
