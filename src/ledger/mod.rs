// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

// Pure calculation layer: everything here works on plain slices loaded by
// the store and touches neither the database nor the network.

pub mod aggregate;
pub mod reconcile;
pub mod recurring;
