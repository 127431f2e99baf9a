// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

mod accounts_test;
mod admin_test;
mod events_test;
mod helpers;
mod jobs_test;
mod results_test;
