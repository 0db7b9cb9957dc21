use super::types::{Document, DocumentOffset};

/// All paragraph text runs of a document, concatenated in document order
pub struct FlatText {
    text: String,
    runs: Vec<RunSpan>,
}

struct RunSpan {
    byte_start: usize,
    byte_end: usize,
    doc_start: u32,
}

impl FlatText {
    pub fn from_document(doc: &Document) -> Self {
        let mut text = String::new();
        let mut runs = Vec::new();
        // Body text begins at index 1, after the leading section break.
        let mut utf16_pos: u32 = 1;

        for element in &doc.body.content {
            let Some(paragraph) = element.paragraph.as_ref() else {
                continue;
            };

            for piece in &paragraph.elements {
                let Some(run) = piece.text_run.as_ref() else {
                    continue;
                };
                if run.content.is_empty() {
                    continue;
                }

                let doc_start = piece.start_index.unwrap_or(utf16_pos);
                let byte_start = text.len();
                text.push_str(&run.content);

                runs.push(RunSpan {
                    byte_start,
                    byte_end: text.len(),
                    doc_start,
                });

                utf16_pos = doc_start + utf16_len(&run.content);
            }
        }

        Self { text, runs }
    }

    /// Start of the rightmost occurrence of `needle`
    pub fn find_last(&self, needle: &str) -> Option<DocumentOffset> {
        if needle.is_empty() {
            return None;
        }
        let byte = self.text.rfind(needle)?;
        self.doc_index(byte)
    }

    /// Every `" " + word` whose right edge is whitespace or the end of its run,
    /// pointing at the word itself, restricted to offsets `>= from`
    pub fn standalone_word_offsets(&self, word: &str, from: DocumentOffset) -> Vec<DocumentOffset> {
        if word.is_empty() {
            return Vec::new();
        }

        let pattern = format!(" {}", word);
        let mut offsets = Vec::new();

        for run in &self.runs {
            let run_text = &self.text[run.byte_start..run.byte_end];

            for (idx, _) in run_text.match_indices(&pattern) {
                let word_end = idx + pattern.len();
                let bounded = run_text[word_end..]
                    .chars()
                    .next()
                    .map_or(true, char::is_whitespace);
                if !bounded {
                    continue;
                }

                if let Some(offset) = self.doc_index(run.byte_start + idx + 1) {
                    if offset >= from {
                        offsets.push(offset);
                    }
                }
            }
        }

        offsets
    }

    fn doc_index(&self, byte: usize) -> Option<DocumentOffset> {
        let run = self
            .runs
            .iter()
            .find(|r| r.byte_start <= byte && byte < r.byte_end)?;
        let within = utf16_len(&self.text[run.byte_start..byte]);
        Some(DocumentOffset(run.doc_start + within))
    }
}

pub fn utf16_len(text: &str) -> u32 {
    text.encode_utf16().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docs::types::{Body, Paragraph, ParagraphElement, StructuralElement, TextRun};

    fn paragraph(runs: &[(Option<u32>, &str)]) -> StructuralElement {
        StructuralElement {
            paragraph: Some(Paragraph {
                elements: runs
                    .iter()
                    .map(|(start, content)| ParagraphElement {
                        start_index: *start,
                        end_index: None,
                        text_run: Some(TextRun {
                            content: content.to_string(),
                        }),
                    })
                    .collect(),
            }),
            ..StructuralElement::default()
        }
    }

    fn document(content: Vec<StructuralElement>) -> Document {
        Document {
            body: Body { content },
            ..Document::default()
        }
    }

    #[test]
    fn test_find_last_picks_rightmost_across_paragraphs() {
        let doc = document(vec![
            paragraph(&[(Some(1), "Notes\n")]),
            paragraph(&[(Some(7), "Transcript:\n")]),
            paragraph(&[(Some(19), "first clip text\n")]),
            paragraph(&[(Some(35), "Transcript:\n")]),
            paragraph(&[(Some(47), "second\n")]),
        ]);
        let flat = FlatText::from_document(&doc);

        assert_eq!(flat.find_last("Transcript:"), Some(DocumentOffset(35)));
    }

    #[test]
    fn test_find_last_not_found() {
        let empty = FlatText::from_document(&Document::default());
        assert_eq!(empty.find_last("Insights:"), None);

        let doc = document(vec![paragraph(&[(Some(1), "Notes\n")])]);
        let flat = FlatText::from_document(&doc);
        assert_eq!(flat.find_last("Insights:"), None);
        assert_eq!(flat.find_last(""), None);
    }

    #[test]
    fn test_offsets_fall_back_when_start_index_missing() {
        let doc = document(vec![
            paragraph(&[(None, "ab\n")]),
            paragraph(&[(None, "cd Insights:\n")]),
        ]);
        let flat = FlatText::from_document(&doc);

        // "ab\n" occupies 1..4, so "cd " starts at 4 and the label at 7.
        assert_eq!(flat.find_last("Insights:"), Some(DocumentOffset(7)));
    }

    #[test]
    fn test_offsets_count_utf16_units() {
        let doc = document(vec![paragraph(&[(Some(1), "😀 é Transcript:\n")])]);
        let flat = FlatText::from_document(&doc);

        // Emoji is two UTF-16 units, "é" is one.
        assert_eq!(flat.find_last("Transcript:"), Some(DocumentOffset(1 + 2 + 1 + 1 + 1)));
    }

    #[test]
    fn test_standalone_word_boundaries() {
        let doc = document(vec![
            paragraph(&[(Some(1), "Click here to watch the clip\n")]),
            paragraph(&[(Some(30), "a clipboard and a clip here")]),
            paragraph(&[(Some(57), " tail clip")]),
        ]);
        let flat = FlatText::from_document(&doc);

        let offsets = flat.standalone_word_offsets("clip", DocumentOffset(0));

        // "the clip\n" -> newline boundary, "a clip here" -> space,
        // "tail clip" -> end of run; "clipboard" is skipped.
        assert_eq!(
            offsets,
            vec![DocumentOffset(25), DocumentOffset(48), DocumentOffset(63)]
        );
    }

    #[test]
    fn test_standalone_word_respects_lower_bound() {
        let doc = document(vec![
            paragraph(&[(Some(1), "old clip\n")]),
            paragraph(&[(Some(10), "new clip\n")]),
        ]);
        let flat = FlatText::from_document(&doc);

        assert_eq!(
            flat.standalone_word_offsets("clip", DocumentOffset(10)),
            vec![DocumentOffset(14)]
        );
    }
}
