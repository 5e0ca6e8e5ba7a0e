//! # Cert-Chain Pipeline Benchmarks
//!
//! Hot paths of one issuance, excluding network round-trips:
//!
//! | Subsystem | Operation | Per issuance |
//! |-----------|-----------|--------------|
//! | cc-01 Interface Codec | encode `issueCertificate` call | 1 |
//! | cc-01 Interface Codec | decode `verifyCertificate` result | 1 per verify |
//! | cc-04 Certificate Pipeline | normalize flat request | 1 |
//! | shared-types | keccak-256 of locator | 1 |
//! | cc-02 Transaction Submission | EIP-155 sign + recover | 1 with local wallet |

use cc_01_interface_codec::codec::{certificate_to_tokens, decode_result, encode_values};
use cc_01_interface_codec::domain::abi::READ_RECORD;
use cc_01_interface_codec::CallRequest;
use cc_02_transaction_submission::adapters::wallet::{recover_raw_transaction, LegacyTransaction};
use cc_02_transaction_submission::adapters::LocalWallet;
use cc_04_certificate_pipeline::config::IssueDefaults;
use cc_04_certificate_pipeline::domain::request::IssueRequest;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use k256::ecdsa::SigningKey;
use rand::Rng;
use serde_json::json;
use shared_types::{keccak256, Address, CertificateTuple, Hash, U256};
use std::time::Duration;

// ============================================================================
// CC-01: Interface Codec
// ============================================================================

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("cc-01-interface-codec");

    let call = CallRequest::issue_record(
        Address::repeat_byte(0xc0),
        Address::repeat_byte(0x0c),
        Hash::repeat_byte(0xcc),
        1,
    );
    group.bench_function("encode_issue_call", |b| {
        b.iter(|| black_box(call.encode().is_ok()))
    });

    let certificate = CertificateTuple {
        issuer: Address::repeat_byte(0x11),
        subject: Address::repeat_byte(0x22),
        category: 1,
        content_hash: Hash::repeat_byte(0x33),
    };
    let Ok(result) = encode_values(
        &READ_RECORD,
        READ_RECORD.outputs,
        &certificate_to_tokens(&certificate),
    ) else {
        panic!("record tuple must encode");
    };
    group.bench_function("decode_record_result", |b| {
        b.iter(|| black_box(decode_result(&READ_RECORD, black_box(&result)).is_ok()))
    });

    group.finish();
}

// ============================================================================
// CC-04: Request Normalization and Content Hashing
// ============================================================================

fn bench_pipeline_prep(c: &mut Criterion) {
    let mut group = c.benchmark_group("cc-04-certificate-pipeline");

    let defaults = IssueDefaults::default();
    let Ok(request) = serde_json::from_value::<IssueRequest>(json!({
        "fullname": "Ada Lovelace",
        "institution": "B",
        "program": "C",
        "activity": "D",
        "category": "E",
        "issuedAt": "2026-01-01"
    })) else {
        panic!("flat request must parse");
    };
    group.bench_function("normalize_flat_request", |b| {
        b.iter(|| black_box(request.normalize(&defaults).is_ok()))
    });

    let mut rng = rand::thread_rng();
    for size in [46usize, 128, 512] {
        let locator: String = (0..size)
            .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
            .collect();
        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("keccak_locator", size), &locator, |b, l| {
            b.iter(|| black_box(keccak256(l.as_bytes())))
        });
    }

    group.finish();
}

// ============================================================================
// CC-02: Local Wallet Signing
// ============================================================================

fn bench_wallet(c: &mut Criterion) {
    let mut group = c.benchmark_group("cc-02-transaction-submission");
    group.measurement_time(Duration::from_secs(10));

    let wallet = LocalWallet::new(SigningKey::random(&mut rand::thread_rng()));
    let Ok(data) = CallRequest::issue_record(
        Address::repeat_byte(0xc0),
        Address::repeat_byte(0x0c),
        Hash::repeat_byte(0xcc),
        1,
    )
    .encode() else {
        panic!("issue call must encode");
    };
    let tx = LegacyTransaction {
        nonce: U256::from(7u64),
        gas_price: U256::from(1_000_000_000u64),
        gas: U256::from(200_000u64),
        to: Some(Address::repeat_byte(0xc0)),
        value: U256::zero(),
        data,
    };

    group.bench_function("sign_legacy_eip155", |b| {
        b.iter(|| black_box(wallet.sign_transaction(&tx, 1337).is_ok()))
    });

    let Ok(raw) = wallet.sign_transaction(&tx, 1337) else {
        panic!("transaction must sign");
    };
    group.bench_function("recover_sender", |b| {
        b.iter(|| black_box(recover_raw_transaction(black_box(&raw)).is_ok()))
    });

    group.finish();
}

criterion_group!(benches, bench_codec, bench_pipeline_prep, bench_wallet);
criterion_main!(benches);
