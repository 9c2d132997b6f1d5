//! End-to-end tests for the upm binary
//!
//! Registry commands run offline; map and search run against a mock
//! UniProt server.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::{
    matchers::{body_string_contains, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

fn upm() -> Command {
    let mut cmd = Command::cargo_bin("upm").unwrap();
    for var in [
        "UPM_API_URL",
        "UPM_POLL_INTERVAL_SECS",
        "UPM_MAX_WAIT_SECS",
        "UPM_BATCH_SIZE",
        "UPM_CONCURRENCY",
        "UPM_PAGE_SIZE",
        "UPM_FORMAT",
        "UPM_COMPRESSED",
        "LOG_LEVEL",
        "LOG_OUTPUT",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

async fn mount_mapping_job(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/idmapping/run"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "jobId": "abc123" })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/idmapping/status/abc123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "jobStatus": "FINISHED" })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/idmapping/results/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "from": "P30542", "to": "ENSG00000163485.17" }],
            "failedIds": ["P00000"]
        })))
        .mount(server)
        .await;
}

#[test]
fn test_no_subcommand_is_usage_error() {
    upm()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("subcommand is required"));
}

#[test]
fn test_fields_by_category() {
    upm()
        .args(["fields", "--category", "Gene Ontology (GO)"])
        .assert()
        .success()
        .stdout(predicate::str::contains("go_p"))
        .stdout(predicate::str::contains("organism_name").not());
}

#[test]
fn test_fields_unknown_category() {
    upm()
        .args(["fields", "--category", "Astrology"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category"));
}

#[test]
fn test_databases() {
    upm()
        .arg("databases")
        .assert()
        .success()
        .stdout(predicate::str::contains("UniProtKB_AC-ID"))
        .stdout(predicate::str::contains("Ensembl"));
}

#[test]
fn test_search_dry_run_prints_query() {
    upm()
        .args([
            "search",
            "--filter",
            "reviewed=true",
            "--filter",
            "length=100..200",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::diff("(reviewed:true AND length:[100 TO 200])\n"));
}

#[test]
fn test_search_bad_filter() {
    upm()
        .args(["search", "--filter", "reviewed", "--dry-run"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid filter 'reviewed'"));
}

#[test]
fn test_map_rejects_unknown_database() {
    upm()
        .args(["map", "-f", "UniProtKB_AC-ID", "-t", "Nowhere", "P30542"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("upm databases"));
}

#[test]
fn test_map_requires_identifiers() {
    upm()
        .args(["map", "-f", "UniProtKB_AC-ID", "-t", "Ensembl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No identifiers given"));
}

#[tokio::test]
async fn test_map_against_mock_server() {
    let server = MockServer::start().await;
    mount_mapping_job(&server).await;

    upm()
        .args(["map", "-f", "UniProtKB_AC-ID", "-t", "Ensembl", "--format", "tsv"])
        .args(["--api-url", &server.uri()])
        .args(["P30542", "P00000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("From\tTo\n"))
        .stdout(predicate::str::contains("P30542\tENSG00000163485.17"))
        .stderr(predicate::str::contains("NOT_FOUND: P00000"));
}

#[tokio::test]
async fn test_map_output_file_is_not_clobbered() {
    let server = MockServer::start().await;
    mount_mapping_job(&server).await;
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("mapped.json");
    std::fs::write(&out, "keep me").unwrap();

    upm()
        .args(["map", "-f", "UniProtKB_AC-ID", "-t", "Ensembl", "--format", "json"])
        .args(["--api-url", &server.uri()])
        .args(["-o", out.to_str().unwrap(), "P30542"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--overwrite"));
    assert_eq!(std::fs::read_to_string(&out).unwrap(), "keep me");

    upm()
        .args(["map", "-f", "UniProtKB_AC-ID", "-t", "Ensembl", "--format", "json"])
        .args(["--api-url", &server.uri()])
        .args(["-o", out.to_str().unwrap(), "--overwrite", "P30542"])
        .assert()
        .success();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written["results"][0]["to_id"], "ENSG00000163485.17");
    assert_eq!(written["is_partial"], false);
}

#[tokio::test]
async fn test_search_against_mock_server() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/uniprotkb/search"))
        .and(query_param("query", "gene:INS"))
        .and(query_param("fields", "accession,gene_names"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Total-Results", "1")
                .set_body_json(serde_json::json!({
                    "results": [{
                        "primaryAccession": "P01308",
                        "genes": [{ "geneName": { "value": "INS" } }]
                    }]
                })),
        )
        .mount(&server)
        .await;

    upm()
        .args(["search", "gene:INS", "--fields", "accession,gene_names", "--format", "tsv"])
        .args(["--api-url", &server.uri()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry\taccession\tgene_names\n"))
        .stdout(predicate::str::contains("P01308\tP01308\tINS"))
        .stderr(predicate::str::contains("Showing 1 of 1 results"));
}

#[tokio::test]
async fn test_orthologs_against_mock_server() {
    let server = MockServer::start().await;

    for (target, job) in [("to=OrthoDB", "groups"), ("to=UniProtKB-Swiss-Prot", "entries")] {
        Mock::given(method("POST"))
            .and(path("/idmapping/run"))
            .and(body_string_contains(target))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "jobId": job })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!("/idmapping/status/{}", job)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "jobStatus": "FINISHED" })),
            )
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/idmapping/results/groups"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{ "from": "P30542", "to": "1234at9604" }],
            "failedIds": ["P99999"]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/idmapping/uniprotkb/results/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {
                    "from": "1234at9604",
                    "to": { "primaryAccession": "P28190", "organism": { "scientificName": "Bos taurus" } }
                },
                {
                    "from": "1234at9604",
                    "to": { "primaryAccession": "P30542", "organism": { "scientificName": "Homo sapiens" } }
                }
            ]
        })))
        .mount(&server)
        .await;

    upm()
        .args(["orthologs", "--organism", "bos", "--fields", "accession", "--format", "tsv"])
        .args(["--api-url", &server.uri()])
        .args(["P30542", "P99999"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Query\tOrthoDB\tOrtholog\taccession\torganism_name\n",
        ))
        .stdout(predicate::str::contains("P30542\t1234at9604\tP28190\tP28190\tBos taurus"))
        .stdout(predicate::str::contains("Homo sapiens").not())
        .stderr(predicate::str::contains("no ortholog: P99999"));
}
