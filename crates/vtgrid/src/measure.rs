//! Incremental measurement of code units/points/clusters/columns consumed
//! by a UTF-8 stream, fed in arbitrary chunks.
//!
//! The last cluster seen in any given chunk is held back rather than
//! counted immediately, because a combining mark delivered in the next
//! chunk could still extend it. This makes the result of feeding a string
//! piecewise identical to feeding it whole, which is the partition-
//! invariance property this module exists to satisfy.

use vtwidth::WidthTable;

use crate::segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurement {
    pub code_units: u64,
    pub code_points: u64,
    pub clusters: u64,
    pub columns: u64,
    pub limit_reached: bool,
}

pub struct Measurer {
    table: WidthTable,
    cluster_limit: Option<u64>,
    pending: Vec<u8>,
    pending_u16: Vec<u16>,
    pending_u32: Vec<u32>,
    result: Measurement,
}

impl Measurer {
    #[must_use]
    pub fn new(table: WidthTable, cluster_limit: Option<u64>) -> Self {
        Measurer {
            table,
            cluster_limit,
            pending: Vec::new(),
            pending_u16: Vec::new(),
            pending_u32: Vec::new(),
            result: Measurement::default(),
        }
    }

    /// Feed the next chunk of UTF-8 bytes. Chunks may split a cluster, a
    /// code point, or even a single UTF-8 byte sequence at any offset.
    pub fn feed(&mut self, bytes: &[u8]) {
        if self.result.limit_reached {
            return;
        }
        self.pending.extend_from_slice(bytes);
        self.drain(false);
    }

    /// Feed the next chunk of UTF-16 code units. A chunk may end with a lone
    /// high surrogate; it is held back until the matching low surrogate
    /// arrives (or replaced with U+FFFD at `finish` if none ever does).
    pub fn feed_utf16(&mut self, units: &[u16]) {
        if self.result.limit_reached {
            return;
        }
        self.pending_u16.extend_from_slice(units);
        self.drain_utf16(false);
    }

    /// Feed the next chunk of UTF-32 code points (already-decoded scalar
    /// values, one code unit per code point).
    pub fn feed_utf32(&mut self, code_points: &[u32]) {
        if self.result.limit_reached {
            return;
        }
        self.pending_u32.extend_from_slice(code_points);
        self.drain_utf32(false);
    }

    /// Flush the final (possibly still-growing) cluster. Call once after
    /// the last `feed`/`feed_utf16`/`feed_utf32`.
    pub fn finish(&mut self) {
        self.drain(true);
        self.drain_utf16(true);
        self.drain_utf32(true);
    }

    #[must_use]
    pub fn result(&self) -> Measurement {
        self.result
    }

    fn drain(&mut self, is_final: bool) {
        let valid_len = match std::str::from_utf8(&self.pending) {
            Ok(_) => self.pending.len(),
            Err(e) => e.valid_up_to(),
        };
        let Ok(s) = std::str::from_utf8(&self.pending[..valid_len]) else {
            return;
        };

        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut offset = 0;
        for cluster in segment::clusters(self.table, s) {
            spans.push((offset, offset + cluster.len()));
            offset += cluster.len();
        }
        if !is_final && !spans.is_empty() {
            // The last cluster might still grow with bytes from the next chunk.
            spans.pop();
        }

        let mut consumed = 0;
        for (start, end) in spans {
            if self.result.limit_reached {
                break;
            }
            let cluster = &s[start..end];
            self.result.code_units += cluster.len() as u64;
            self.result.code_points += cluster.chars().count() as u64;
            self.result.clusters += 1;
            let base = segment::base_code_point(cluster);
            self.result.columns += u64::from(vtwidth::display_width(self.table, base));
            consumed = end;
            if let Some(limit) = self.cluster_limit {
                if self.result.clusters >= limit {
                    self.result.limit_reached = true;
                }
            }
        }
        self.pending.drain(..consumed);
    }

    fn drain_utf16(&mut self, is_final: bool) {
        if self.pending_u16.is_empty() {
            return;
        }
        let buf = std::mem::take(&mut self.pending_u16);
        let mut code_points = Vec::new();
        let mut units = Vec::new();
        let mut i = 0;
        while i < buf.len() {
            let u = buf[i];
            if (0xD800..=0xDBFF).contains(&u) {
                if let Some(&low) = buf.get(i + 1) {
                    if let Some(cp) = vtwidth::utf8::utf16_join(u, low) {
                        code_points.push(cp);
                        units.push(2);
                        i += 2;
                        continue;
                    }
                    // Unpaired high surrogate followed by a non-low unit.
                    code_points.push(0xFFFD);
                    units.push(1);
                    i += 1;
                } else if is_final {
                    code_points.push(0xFFFD);
                    units.push(1);
                    i += 1;
                } else {
                    // Might still be completed by the next chunk's low surrogate.
                    break;
                }
            } else {
                code_points.push(u32::from(u));
                units.push(1);
                i += 1;
            }
        }
        let consumed_cps = self.drain_from_code_points(&code_points, &units, is_final);
        let consumed_units: usize = units[..consumed_cps].iter().sum::<u64>() as usize;
        self.pending_u16 = buf[consumed_units..].to_vec();
    }

    fn drain_utf32(&mut self, is_final: bool) {
        if self.pending_u32.is_empty() {
            return;
        }
        let buf = std::mem::take(&mut self.pending_u32);
        let units = vec![1u64; buf.len()];
        let consumed_cps = self.drain_from_code_points(&buf, &units, is_final);
        self.pending_u32 = buf[consumed_cps..].to_vec();
    }

    /// Shared clustering pass for the UTF-16/UTF-32 paths: `code_points[i]`
    /// took `units[i]` source code units to decode. Builds a scalar-value
    /// string from `code_points` (invalid scalars, e.g. unpaired
    /// surrogates, become U+FFFD) and clusters it exactly like the UTF-8
    /// path, then maps cluster boundaries back through `units` so
    /// `code_units` still counts units of the source encoding. Returns how
    /// many entries of `code_points` were consumed.
    fn drain_from_code_points(&mut self, code_points: &[u32], units: &[u64], is_final: bool) -> usize {
        let s: String = code_points.iter().map(|&cp| char::from_u32(cp).unwrap_or('\u{FFFD}')).collect();

        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut offset = 0;
        for cluster in segment::clusters(self.table, &s) {
            spans.push((offset, offset + cluster.len()));
            offset += cluster.len();
        }
        if !is_final && !spans.is_empty() {
            spans.pop();
        }

        let mut cp_cursor = 0usize;
        for (start, end) in spans {
            if self.result.limit_reached {
                break;
            }
            let cluster = &s[start..end];
            let cluster_cp_count = cluster.chars().count();
            let cluster_units: u64 = units[cp_cursor..cp_cursor + cluster_cp_count].iter().sum();
            self.result.code_units += cluster_units;
            self.result.code_points += cluster_cp_count as u64;
            self.result.clusters += 1;
            let base = segment::base_code_point(cluster);
            self.result.columns += u64::from(vtwidth::display_width(self.table, base));
            cp_cursor += cluster_cp_count;
            if let Some(limit) = self.cluster_limit {
                if self.result.clusters >= limit {
                    self.result.limit_reached = true;
                }
            }
        }
        cp_cursor
    }
}

/// Measure a complete, in-memory string in one call.
#[must_use]
pub fn measure(table: WidthTable, s: &str, cluster_limit: Option<u64>) -> Measurement {
    let mut m = Measurer::new(table, cluster_limit);
    m.feed(s.as_bytes());
    m.finish();
    m.result()
}
