// Tracelog - Ethereum simulation trace reporter
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use alloy_primitives::U256;

/// Maximum number of decimals kept when scaling to gwei or ETH.
const MAX_DECIMALS: u8 = 4;

/// Render a wei amount with the most readable unit.
///
/// Small amounts stay in wei, mid-sized ones are shown in gwei and
/// everything from `10^14` wei upwards in ETH, with at most four decimals.
pub fn wei_to_human_readable(wei: U256) -> String {
    if wei.is_zero() {
        "0 ETH".to_string()
    } else if wei < U256::from(100_000u64) {
        format!("{wei} wei")
    } else if wei < U256::from(100_000_000_000_000u64) {
        format!("{} gwei", to_decimal_string(wei, 9))
    } else {
        format!("{} ETH", to_decimal_string(wei, 18))
    }
}

/// `value / 10^exponent` with at most [`MAX_DECIMALS`] decimals, trailing zeros removed.
fn to_decimal_string(value: U256, exponent: u8) -> String {
    let one_unit = U256::from(10u64).pow(U256::from(exponent));
    let one_decimal = U256::from(10u64).pow(U256::from(exponent - MAX_DECIMALS));

    let (integer, remainder) = value.div_rem(one_unit);
    let decimals = remainder / one_decimal;
    if decimals.is_zero() {
        return integer.to_string();
    }

    let decimals = format!("{:0>width$}", decimals.to_string(), width = MAX_DECIMALS as usize);
    format!("{integer}.{}", decimals.trim_end_matches('0'))
}
