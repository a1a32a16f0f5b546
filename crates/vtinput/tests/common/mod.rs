use vtinput::Decoder;

fn decode_in_chunks(data: &[&[u8]]) -> Vec<String> {
    let mut decoder = Decoder::new();
    let mut lines = Vec::new();
    for chunk in data {
        decoder.feed(chunk, &mut |event| lines.push(format!("{event:?}")));
    }
    lines
}

/// Assert that feeding `input` as one chunk produces the same event stream
/// as feeding it split at every possible chunk size, mirroring the
/// partition-invariance property the grid-side measurer also guarantees.
pub fn assert_partition_invariant(input: &[u8]) {
    let whole = decode_in_chunks(&[input]);
    for chunk_size in 1..=input.len() {
        let chunks: Vec<&[u8]> = input.chunks(chunk_size).collect();
        let chunked = decode_in_chunks(&chunks);
        assert_eq!(whole, chunked, "mismatch at chunk size {chunk_size} for input {input:02X?}");
    }
}
