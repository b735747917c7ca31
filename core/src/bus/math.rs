//! Hardware DIV and SQRT units (spec §4.1 "DIV trigger offsets", "SQRT trigger
//! offsets"; spec §8 scenario 3).

use super::io::IoFile;
use super::regs;

/// DIVCNT bit 14: divide-by-zero.
const DIV_ERROR_BIT: u16 = 1 << 14;

/// Run the division configured by DIVCNT/DIVNUMER/DIVDENOM and store the
/// result, leaving everything untouched but the error bit on divide-by-zero.
pub fn run_div(io: &mut IoFile) {
    let divcnt: u16 = io.read(regs::DIVCNT);
    let mode = divcnt & 0b11;
    let (quotient, remainder, div_by_zero) = match mode {
        0 => {
            let n = io.read::<u32>(regs::DIVNUMER) as i32;
            let d = io.read::<u32>(regs::DIVDENOM) as i32;
            if d == 0 {
                (0i64, 0i64, true)
            } else {
                (n as i64 / d as i64, (n as i64 % d as i64), false)
            }
        }
        1 => {
            let n = io.read::<u64>(regs::DIVNUMER) as i64;
            let d = io.read::<u32>(regs::DIVDENOM) as i32 as i64;
            if d == 0 {
                (0, 0, true)
            } else {
                (n / d, n % d, false)
            }
        }
        _ => {
            let n = io.read::<u64>(regs::DIVNUMER) as i64;
            let d = io.read::<u64>(regs::DIVDENOM) as i64;
            if d == 0 {
                (0, 0, true)
            } else {
                (n / d, n % d, false)
            }
        }
    };

    if div_by_zero {
        io.force_write::<u16>(regs::DIVCNT, divcnt | DIV_ERROR_BIT);
        return;
    }

    io.force_write::<u16>(regs::DIVCNT, divcnt & !DIV_ERROR_BIT);
    io.force_write::<u64>(regs::DIVRESULT, quotient as u64);
    io.force_write::<u64>(regs::DIVREMRESULT, remainder as u64);
}

/// Run `floor(sqrt(param))`, 32- or 64-bit operand selected by SQRTCNT bit 0.
pub fn run_sqrt(io: &mut IoFile) {
    let sqrtcnt: u16 = io.read(regs::SQRTCNT);
    let param: u64 = if sqrtcnt & 1 == 0 {
        io.read::<u64>(regs::SQRTPARAM) as u32 as u64
    } else {
        io.read(regs::SQRTPARAM)
    };
    io.force_write::<u32>(regs::SQRTRESULT, isqrt(param) as u32);
}

fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    let mut x = n;
    let mut y = (x + 1) / 2;
    while y < x {
        x = y;
        y = (x + n / x) / 2;
    }
    x
}
