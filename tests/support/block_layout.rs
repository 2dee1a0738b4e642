// Byte-level walk over a well-formed block, independent of the decoder.
//
// Cutting a block right after a sequence's literals leaves a shorter block
// whose final control byte still carries that sequence's match nibble.  The
// decoder rejects a non-zero nibble there.  A zero nibble (a match of exactly
// MIN_MATCH bytes) is indistinguishable from a genuine final literal run, so
// those cut points are the only truncations that may still parse.

fn skip_length(block: &[u8], pos: &mut usize) -> usize {
    let mut len = 0;
    loop {
        let byte = block[*pos];
        *pos += 1;
        len += byte as usize;
        if byte != 255 {
            return len;
        }
    }
}

/// Block lengths that end right after the literals of a sequence whose match
/// nibble is zero.
#[allow(dead_code)]
pub fn ambiguous_cut_points(block: &[u8]) -> Vec<usize> {
    let mut points = Vec::new();
    let mut pos = 0;
    if block.is_empty() {
        return points;
    }
    loop {
        let token = block[pos];
        pos += 1;
        let mut run = (token >> 4) as usize;
        if run == 15 {
            run += skip_length(block, &mut pos);
        }
        pos += run;
        if pos == block.len() {
            return points;
        }
        if token & 0x0F == 0 {
            points.push(pos);
        }
        pos += 2;
        if token & 0x0F == 0x0F {
            skip_length(block, &mut pos);
        }
    }
}
