use ingreso_serving::{Server, ServerConfig, ServerState, ServingError};
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

fn write_linear_artifacts(dir: &std::path::Path) {
    let min = vec![0.0; 14];
    let scale = vec![0.01; 14];
    let scaler = serde_json::json!({
        "type": "min_max",
        "min": min,
        "scale": scale,
    });
    let mut coef = vec![0.0; 14];
    coef[0] = 1.0;
    let model = serde_json::json!({
        "type": "linear",
        "classes": [0, 1],
        "coef": coef,
        "intercept": -0.5,
    });
    std::fs::write(dir.join("scaler.json"), scaler.to_string()).unwrap();
    std::fs::write(dir.join("modelo_svm_rbf.json"), model.to_string()).unwrap();
}

async fn raw_request(addr: std::net::SocketAddr, request: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    response
}

fn post_form(body: &str) -> String {
    format!(
        "POST /predecir HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{}",
        body.len(),
        body
    )
}

const ZERO_FORM: &str = "edad=70&tipo_empleado=0&fnlwgt=0&educacion=0&educacion_num=0\
                         &estado_civil=0&ocupacion=0&relacion=0&raza=0&sexo=0\
                         &capital_ganado=0&capital_perdido=0&hr_por_semana=0&pais=0";

#[tokio::test]
async fn test_start_serve_stop() {
    let dir = tempdir().unwrap();
    write_linear_artifacts(dir.path());

    let config = ServerConfig::builder()
        .host("127.0.0.1")
        .port(0)
        .artifact_dir(dir.path())
        .build();
    let server = Server::new(config);
    server.start().await.unwrap();

    let health = server.health();
    assert!(health.healthy);
    assert_eq!(health.state, ServerState::Running);
    assert_eq!(health.details.get("model").map(String::as_str), Some("linear"));

    let addr = server.local_addr().unwrap();
    assert_ne!(addr.port(), 0);
    assert_eq!(
        health.details.get("port"),
        Some(&addr.port().to_string())
    );

    let response = raw_request(addr, &post_form(ZERO_FORM)).await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("<strong id=\"prediccion\">1</strong>"));

    let response = raw_request(addr, &post_form("edad=1")).await;
    assert!(response.starts_with("HTTP/1.1 200"));
    assert!(response.contains("Error en la predicción: missing form field 'tipo_empleado'"));

    server.stop().await.unwrap();
    assert_eq!(server.state(), ServerState::Stopped);
    assert!(server.context().is_none());
}

#[tokio::test]
async fn test_wrong_width_artifacts_fail_per_request() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("scaler.json"),
        r#"{"type": "standard", "mean": [0.0, 0.0], "scale": [1.0, 1.0]}"#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("modelo_svm_rbf.json"),
        r#"{"type": "linear", "classes": [0, 1], "coef": [1.0, 1.0], "intercept": 0.0}"#,
    )
    .unwrap();

    let config = ServerConfig::builder()
        .port(0)
        .artifact_dir(dir.path())
        .build();
    let server = Server::new(config);
    server.start().await.unwrap();
    assert!(server.is_running());

    let addr = server.local_addr().unwrap();
    for _ in 0..2 {
        let response = raw_request(addr, &post_form(ZERO_FORM)).await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("Error en la predicción: scaler expects 2 features, got 14"));
    }
    assert!(server.is_running());

    server.stop().await.unwrap();
    assert_eq!(server.state(), ServerState::Stopped);
}

#[tokio::test]
async fn test_start_rejects_malformed_model() {
    let dir = tempdir().unwrap();
    write_linear_artifacts(dir.path());
    std::fs::write(dir.path().join("modelo_svm_rbf.json"), "not json").unwrap();

    let config = ServerConfig::builder()
        .port(0)
        .artifact_dir(dir.path())
        .build();
    let server = Server::new(config);
    let err = server.start().await.unwrap_err();

    assert!(matches!(err, ServingError::ArtifactLoad { .. }));
    assert!(err.to_string().contains("modelo_svm_rbf.json"));
    assert_eq!(server.state(), ServerState::Error);
}
