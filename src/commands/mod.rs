// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod users;
pub mod products;
pub mod wallet;
pub mod invest;
pub mod transactions;
pub mod analytics;
pub mod exporter;
pub mod doctor;
