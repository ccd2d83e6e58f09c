// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod products;
pub mod sales;
pub mod expenses;
pub mod credits;
pub mod petty_cash;
pub mod settings;
pub mod reports;
pub mod importer;
pub mod exporter;
pub mod doctor;
