use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binario aislado: sin variables del entorno ni base en el HOME real
fn obras(home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("obras");
    cmd.env("HOME", home.path())
        .env_remove("OBRAS_DB")
        .env_remove("RUST_LOG")
        .env_remove("OBRAS_API_URL")
        .env_remove("OBRAS_API_TOKEN");
    cmd
}

#[test]
fn test_validar_ruc_valido() {
    let home = TempDir::new().unwrap();
    obras(&home)
        .args(["validar", "ruc", "20131312955"])
        .assert()
        .success()
        .stdout(predicate::str::contains("válido"));
}

#[test]
fn test_validar_ruc_prefijo_invalido() {
    let home = TempDir::new().unwrap();
    obras(&home)
        .args(["validar", "ruc", "30131312955"])
        .assert()
        .failure()
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn test_penalidad_json() {
    let home = TempDir::new().unwrap();
    obras(&home)
        .args(["--json", "penalidad", "--monto", "100000", "--plazo", "100", "--dias-atraso", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"penalidad_diaria\": 400.0"))
        .stdout(predicate::str::contains("\"monto\": 4000.0"));
}

#[test]
fn test_penalidad_monto_no_numerico() {
    let home = TempDir::new().unwrap();
    obras(&home)
        .args(["penalidad", "--monto", "NaN", "--plazo", "100", "--dias-atraso", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("monto del contrato"));
}

#[test]
fn test_calcular_valorizacion_sin_conexion() {
    let home = TempDir::new().unwrap();
    obras(&home)
        .args([
            "valorizaciones",
            "calcular",
            "--bruto",
            "10000",
            "--retencion-pct",
            "5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total deducciones"))
        .stdout(predicate::str::contains("S/ 500.00"))
        .stdout(predicate::str::contains("S/ 11,210.00"));
}

#[test]
fn test_config_fijar_y_ver() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("config.db");
    let db = db.to_str().unwrap();

    obras(&dir)
        .args(["--db", db, "config", "fijar", "igv_porcentaje", "10"])
        .assert()
        .success();

    obras(&dir)
        .args(["--db", db, "config", "ver"])
        .assert()
        .success()
        .stdout(predicate::str::contains("igv_porcentaje = 10"))
        .stdout(predicate::str::contains("moneda = PEN"));
}

#[test]
fn test_config_rechaza_clave_desconocida() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("config.db");

    obras(&dir)
        .args(["--db", db.to_str().unwrap(), "config", "fijar", "color", "azul"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Clave de configuración desconocida"));
}

#[test]
fn test_api_url_invalida() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("config.db");

    obras(&dir)
        .args(["--db", db.to_str().unwrap(), "--api-url", "ftp://x", "obras", "listar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http://"));
}
