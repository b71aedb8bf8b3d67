// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// uft-security: content hashing and symmetric file encryption.
//
// Hashing covers the three digests offered by the text `hash` operation.
// Encryption is AES-256-GCM via `ring`; keys are random and handed back to
// the user as hex, never stored.

pub mod cipher;
pub mod integrity;

pub use cipher::{AesKey, open_hex, seal_hex};
pub use integrity::{HashAlgorithm, digest, hash_bytes, hash_file};
