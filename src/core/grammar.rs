/// 將多個描述組成自然語句清單，例如 "a, b, and c"
///
/// 兩個元素時同樣保留 "and" 前的逗號 ("a, and b")。
pub fn make_list_grammar<S: AsRef<str>>(descriptions: &[S]) -> String {
    match descriptions {
        [] => String::new(),
        [only] => only.as_ref().to_string(),
        [head @ .., last] => {
            let mut sentence = head
                .iter()
                .map(|description| description.as_ref())
                .collect::<Vec<_>>()
                .join(", ");
            sentence.push_str(", and ");
            sentence.push_str(last.as_ref());
            sentence
        }
    }
}
