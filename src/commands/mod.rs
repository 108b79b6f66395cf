// Copyright (c) 2025 Hogar contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod household;
pub mod transactions;
pub mod recurring;
pub mod budgets;
pub mod goals;
pub mod huchas;
pub mod months;
pub mod positions;
pub mod networth;
pub mod reports;
pub mod importer;
pub mod exporter;
