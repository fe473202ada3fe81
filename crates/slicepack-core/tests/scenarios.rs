//! End-to-end scenarios exercising `load_release` and `select` against
//! real fixture directories on disk.

use std::fs;
use std::path::Path;

use slicepack_core::{load_release, select, Error, SliceKey};
use tempfile::tempdir;

/// Generate a fresh, self-signed PGP key pair for tests, the same way the
/// crypto collaborator's upstream crate recommends for throwaway signing
/// keys: RSA-2048, self-signed, no passphrase.
fn generate_test_key() -> (String, String) {
    use pgp::crypto::{HashAlgorithm, SymmetricKeyAlgorithm};
    use pgp::types::{CompressionAlgorithm, KeyTrait, SecretKeyTrait};
    use pgp::{KeyType, SecretKeyParamsBuilder};
    use smallvec::smallvec;

    let mut builder = SecretKeyParamsBuilder::default();
    builder
        .key_type(KeyType::Rsa(2048))
        .preferred_symmetric_algorithms(smallvec![SymmetricKeyAlgorithm::AES256])
        .preferred_hash_algorithms(smallvec![HashAlgorithm::SHA2_256])
        .preferred_compression_algorithms(smallvec![CompressionAlgorithm::ZLIB])
        .can_create_certificates(false)
        .can_sign(true)
        .primary_user_id("release-test <test@example.com>".to_string());
    let params = builder.build().expect("valid key params");
    let secret_key = params.generate().expect("key generation succeeds");
    let signed_secret = secret_key.sign(String::new).expect("self-sign succeeds");
    let public_key = signed_secret.public_key();
    let signed_public = public_key
        .sign(&signed_secret, String::new)
        .expect("public key self-sign succeeds");
    let armor = signed_public
        .to_armored_string(None)
        .expect("armor succeeds");
    let id = hex::encode(signed_public.fingerprint());
    (armor, id)
}

fn indent_armor(armor: &str) -> String {
    armor
        .lines()
        .map(|line| format!("      {line}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn chisel_yaml() -> String {
    let (armor, id) = generate_test_key();
    format!(
        "format: v1\narchives:\n  ubuntu:\n    version: \"22.04\"\n    components: [main]\n    default: true\n    public-keys: [signing]\npublic-keys:\n  signing:\n    id: {id:?}\n    armor: |\n{}\n",
        indent_armor(&armor)
    )
}

fn write_release(root: &Path, packages: &[(&str, &str)]) {
    fs::write(root.join("chisel.yaml"), chisel_yaml()).unwrap();
    let slices_dir = root.join("slices");
    fs::create_dir_all(&slices_dir).unwrap();
    for (name, body) in packages {
        fs::write(slices_dir.join(format!("{name}.yaml")), body).unwrap();
    }
}

#[test]
fn single_archive_single_slice() {
    let dir = tempdir().unwrap();
    write_release(
        dir.path(),
        &[(
            "libc6",
            "
package: libc6
slices:
  libs:
    contents:
      /usr/lib/x86_64-linux-gnu/libc.so.6:
        copy: /usr/lib/x86_64-linux-gnu/libc.so.6
",
        )],
    );

    let release = load_release(dir.path()).unwrap();
    let selection = select(&release, &[SliceKey::new("libc6", "libs")]).unwrap();
    assert_eq!(selection.len(), 1);
    let keys: Vec<_> = selection.slice_keys().collect();
    assert_eq!(keys, vec![&SliceKey::new("libc6", "libs")]);
}

#[test]
fn essential_cycle_is_rejected_at_load() {
    let dir = tempdir().unwrap();
    write_release(
        dir.path(),
        &[
            (
                "pkg-a",
                "
package: pkg-a
slices:
  aaa:
    essential: [pkg-b_bbb]
    contents: {}
",
            ),
            (
                "pkg-b",
                "
package: pkg-b
slices:
  bbb:
    essential: [pkg-a_aaa]
    contents: {}
",
            ),
        ],
    );

    let err = load_release(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Cycle(_)));
}

#[test]
fn cross_package_copy_conflict_is_rejected() {
    let dir = tempdir().unwrap();
    write_release(
        dir.path(),
        &[
            (
                "p1",
                "
package: p1
slices:
  xxx:
    contents:
      /etc/hosts:
        copy: /etc/hosts
",
            ),
            (
                "p2",
                "
package: p2
slices:
  yyy:
    contents:
      /etc/hosts:
        copy: /etc/hosts
",
            ),
        ],
    );

    let err = load_release(dir.path()).unwrap_err();
    match err {
        Error::Conflict(message) => {
            assert!(message.contains("p1_xxx"));
            assert!(message.contains("p2_yyy"));
            assert!(message.find("p1_xxx").unwrap() < message.find("p2_yyy").unwrap());
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[test]
fn intra_package_duplicate_copy_succeeds() {
    let dir = tempdir().unwrap();
    write_release(
        dir.path(),
        &[(
            "pk1",
            "
package: pk1
slices:
  aaa:
    contents:
      /lib/foo:
        copy: /lib/foo
  bbb:
    contents:
      /lib/foo:
        copy: /lib/foo
",
        )],
    );

    assert!(load_release(dir.path()).is_ok());
}

#[test]
fn glob_over_foreign_literal_is_rejected() {
    let dir = tempdir().unwrap();
    write_release(
        dir.path(),
        &[
            (
                "p1",
                "
package: p1
slices:
  xxx:
    contents:
      /usr/bin/*: {}
",
            ),
            (
                "p2",
                "
package: p2
slices:
  yyy:
    contents:
      /usr/bin/ls:
        copy: /usr/bin/ls
",
            ),
        ],
    );

    let err = load_release(dir.path()).unwrap_err();
    match err {
        Error::Conflict(message) => {
            assert!(message.contains("/usr/bin/*"));
            assert!(message.contains("/usr/bin/ls"));
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[test]
fn selecting_a_slice_pulls_in_its_transitive_essentials() {
    let dir = tempdir().unwrap();
    write_release(
        dir.path(),
        &[
            (
                "app",
                "
package: app
slices:
  bin:
    essential: [libc6_libs]
    contents:
      /usr/bin/app:
        copy: /usr/bin/app
",
            ),
            (
                "libc6",
                "
package: libc6
slices:
  libs:
    contents:
      /usr/lib/x86_64-linux-gnu/libc.so.6:
        copy: /usr/lib/x86_64-linux-gnu/libc.so.6
",
            ),
        ],
    );

    let release = load_release(dir.path()).unwrap();
    let selection = select(&release, &[SliceKey::new("app", "bin")]).unwrap();

    let keys: Vec<_> = selection.slice_keys().collect();
    assert_eq!(
        keys,
        vec![&SliceKey::new("libc6", "libs"), &SliceKey::new("app", "bin")]
    );
}

#[test]
fn generate_path_defers_bogus_value_to_select() {
    let dir = tempdir().unwrap();
    write_release(
        dir.path(),
        &[(
            "pk1",
            "
package: pk1
slices:
  mmm:
    contents:
      /var/lib/manifest/**:
        generate: manifest
",
        )],
    );
    let release = load_release(dir.path()).unwrap();
    assert!(select(&release, &[SliceKey::new("pk1", "mmm")]).is_ok());

    let dir = tempdir().unwrap();
    write_release(
        dir.path(),
        &[(
            "pk1",
            "
package: pk1
slices:
  mmm:
    contents:
      /var/lib/manifest/**:
        generate: bogus
",
        )],
    );
    let release = load_release(dir.path()).unwrap();
    let err = select(&release, &[SliceKey::new("pk1", "mmm")]).unwrap_err();
    assert!(matches!(err, Error::Selection(_)));
}
