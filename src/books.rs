//! Catalog of the 66 canonical book codes and their Korean display names

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Testament {
    Old,
    New,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BookInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub testament: Testament,
}

impl BookInfo {
    const fn new(code: &'static str, name: &'static str, testament: Testament) -> Self {
        Self { code, name, testament }
    }
}

/// Canonical order: 39 Old Testament books, then 27 New Testament books.
pub static BOOKS: [BookInfo; 66] = [
    BookInfo::new("창", "창세기", Testament::Old),
    BookInfo::new("출", "출애굽기", Testament::Old),
    BookInfo::new("레", "레위기", Testament::Old),
    BookInfo::new("민", "민수기", Testament::Old),
    BookInfo::new("신", "신명기", Testament::Old),
    BookInfo::new("수", "여호수아", Testament::Old),
    BookInfo::new("삿", "사사기", Testament::Old),
    BookInfo::new("룻", "룻기", Testament::Old),
    BookInfo::new("삼상", "사무엘상", Testament::Old),
    BookInfo::new("삼하", "사무엘하", Testament::Old),
    BookInfo::new("왕상", "열왕기상", Testament::Old),
    BookInfo::new("왕하", "열왕기하", Testament::Old),
    BookInfo::new("대상", "역대상", Testament::Old),
    BookInfo::new("대하", "역대하", Testament::Old),
    BookInfo::new("스", "에스라", Testament::Old),
    BookInfo::new("느", "느헤미야", Testament::Old),
    BookInfo::new("에", "에스더", Testament::Old),
    BookInfo::new("욥", "욥기", Testament::Old),
    BookInfo::new("시", "시편", Testament::Old),
    BookInfo::new("잠", "잠언", Testament::Old),
    BookInfo::new("전", "전도서", Testament::Old),
    BookInfo::new("아", "아가", Testament::Old),
    BookInfo::new("사", "이사야", Testament::Old),
    BookInfo::new("렘", "예레미야", Testament::Old),
    BookInfo::new("애", "예레미야애가", Testament::Old),
    BookInfo::new("겔", "에스겔", Testament::Old),
    BookInfo::new("단", "다니엘", Testament::Old),
    BookInfo::new("호", "호세아", Testament::Old),
    BookInfo::new("욜", "요엘", Testament::Old),
    BookInfo::new("암", "아모스", Testament::Old),
    BookInfo::new("옵", "오바댜", Testament::Old),
    BookInfo::new("욘", "요나", Testament::Old),
    BookInfo::new("미", "미가", Testament::Old),
    BookInfo::new("나", "나훔", Testament::Old),
    BookInfo::new("합", "하박국", Testament::Old),
    BookInfo::new("습", "스바냐", Testament::Old),
    BookInfo::new("학", "학개", Testament::Old),
    BookInfo::new("슥", "스가랴", Testament::Old),
    BookInfo::new("말", "말라기", Testament::Old),
    BookInfo::new("마", "마태복음", Testament::New),
    BookInfo::new("막", "마가복음", Testament::New),
    BookInfo::new("눅", "누가복음", Testament::New),
    BookInfo::new("요", "요한복음", Testament::New),
    BookInfo::new("행", "사도행전", Testament::New),
    BookInfo::new("롬", "로마서", Testament::New),
    BookInfo::new("고전", "고린도전서", Testament::New),
    BookInfo::new("고후", "고린도후서", Testament::New),
    BookInfo::new("갈", "갈라디아서", Testament::New),
    BookInfo::new("엡", "에베소서", Testament::New),
    BookInfo::new("빌", "빌립보서", Testament::New),
    BookInfo::new("골", "골로새서", Testament::New),
    BookInfo::new("살전", "데살로니가전서", Testament::New),
    BookInfo::new("살후", "데살로니가후서", Testament::New),
    BookInfo::new("딤전", "디모데전서", Testament::New),
    BookInfo::new("딤후", "디모데후서", Testament::New),
    BookInfo::new("딛", "디도서", Testament::New),
    BookInfo::new("몬", "빌레몬서", Testament::New),
    BookInfo::new("히", "히브리서", Testament::New),
    BookInfo::new("약", "야고보서", Testament::New),
    BookInfo::new("벧전", "베드로전서", Testament::New),
    BookInfo::new("벧후", "베드로후서", Testament::New),
    BookInfo::new("요일", "요한일서", Testament::New),
    BookInfo::new("요이", "요한이서", Testament::New),
    BookInfo::new("요삼", "요한삼서", Testament::New),
    BookInfo::new("유", "유다서", Testament::New),
    BookInfo::new("계", "요한계시록", Testament::New),
];

pub fn book_info(code: &str) -> Option<&'static BookInfo> {
    BOOKS.iter().find(|b| b.code == code)
}

pub fn display_name(code: &str) -> Option<&'static str> {
    book_info(code).map(|b| b.name)
}

pub fn is_known(code: &str) -> bool {
    book_info(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_shape() {
        let codes: HashSet<_> = BOOKS.iter().map(|b| b.code).collect();
        assert_eq!(codes.len(), 66);
        assert_eq!(BOOKS.iter().filter(|b| b.testament == Testament::Old).count(), 39);
        assert_eq!(BOOKS[0].code, "창");
        assert_eq!(BOOKS[65].code, "계");
    }

    #[test]
    fn test_lookup() {
        assert_eq!(display_name("요"), Some("요한복음"));
        assert_eq!(display_name("요일"), Some("요한일서"));
        assert_eq!(book_info("말").map(|b| b.testament), Some(Testament::Old));
        assert!(!is_known("Gen"));
        assert_eq!(display_name(""), None);
    }
}
