//! TypeScript type descriptor for the generated data.
//!
//! Consumers import `docs.ts` to get literal unions of locales, document keys
//! and per-document section ids, so a lookup with a stale section id fails to
//! type-check instead of failing soft at runtime.

use crate::models::DocsData;

/// Render `docs.ts`. Document keys and section ids come from the master
/// locale, or the first locale when the master is absent.
pub fn render_type_descriptor(data: &DocsData, master_locale: &str, generated_at: &str) -> String {
    let locales: Vec<&str> = data.keys().map(String::as_str).collect();
    let master_docs = data.get(master_locale).or_else(|| data.values().next());
    let doc_keys: Vec<&str> = master_docs
        .map(|docs| docs.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut out = format!(
        "// Auto-generated types for structured documentation\n\
         // Generated at: {generated_at}\n\
         // Master locale: {master_locale}\n\
         \n\
         export type Locale = {}\n\
         \n\
         export type DocKey = {}\n\
         \n\
         export interface DocSectionIds {{\n",
        union(&locales),
        union(&doc_keys),
    );
    if let Some(docs) = master_docs {
        for (key, doc) in docs {
            out.push_str(&format!("  {}: {}\n", quote(key), union(&doc.section_ids())));
        }
    }
    out.push_str("}\n");
    out.push_str(HELPER_TYPES);
    out.push_str(MODEL_TYPES);

    out.push_str(&format!(
        "\n\
         export const AVAILABLE_LOCALES: Locale[] = [{}]\n\
         export const AVAILABLE_DOC_KEYS: DocKey[] = [{}]\n\
         export const MASTER_LOCALE: Locale = {}\n",
        list(&locales),
        list(&doc_keys),
        quote(master_locale),
    ));

    out
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn union(values: &[&str]) -> String {
    if values.is_empty() {
        return "never".to_string();
    }
    values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(" | ")
}

fn list(values: &[&str]) -> String {
    values.iter().map(|v| quote(v)).collect::<Vec<_>>().join(", ")
}

const HELPER_TYPES: &str = "
export type SectionIdOf<T extends DocKey> = DocSectionIds[T]
export type AllSectionIds = DocSectionIds[DocKey]

export type ValidSectionId<TDoc extends DocKey, TSection extends string> =
  TSection extends DocSectionIds[TDoc] ? TSection : never
";

const MODEL_TYPES: &str = "
export interface FormattingRange {
  start: number
  end: number
}

export interface Paragraph {
  text: string
  formatting: {
    bold: FormattingRange[]
    italic: FormattingRange[]
    code: FormattingRange[]
    strikethrough: FormattingRange[]
    links: Array<FormattingRange & { url: string; title?: string }>
  }
}

export interface Heading {
  text: string
  level: number
  id: string
}

export interface ListItem {
  content: ContentBlock[]
  level: number
  type: 'ordered' | 'unordered'
  children?: ListItem[]
}

export interface TaskItem {
  content: string
  checked: boolean
}

export interface TableRow {
  cells: string[]
  type: 'header' | 'data'
}

export interface Table {
  headers: string[]
  rows: TableRow[]
}

export interface CodeBlock {
  language: string
  code: string
  filename?: string
  meta?: string
}

export interface DiagramBlock {
  code: string
  title?: string
}

export interface Blockquote {
  content: ContentBlock[]
  type?: 'tip' | 'warning' | 'info' | 'note'
  emoji?: string
}

export type ContentBlock =
  | { type: 'paragraph'; data: Paragraph }
  | { type: 'heading'; data: Heading }
  | { type: 'list'; data: ListItem[] }
  | { type: 'taskList'; data: TaskItem[] }
  | { type: 'table'; data: Table }
  | { type: 'code'; data: CodeBlock }
  | { type: 'diagram'; data: DiagramBlock }
  | { type: 'blockquote'; data: Blockquote }
  | { type: 'divider' }
  | { type: 'lineBreak' }
  | { type: 'rawMarkup'; data: { content: string } }

export interface DocSection {
  id: string
  title: string
  level: number
  content: ContentBlock[]
  metadata: {
    wordCount: number
    codeBlocksCount: number
    diagramsCount: number
    tasksCount: number
    hasTable: boolean
    hasBlockquotes: boolean
    hasDiagrams: boolean
    hasTasks: boolean
  }
}

export interface DocContent {
  title: string
  description?: string
  sections: DocSection[]
  features: string[]
  frontMatter?: Record<string, unknown>
  metadata: {
    lastModified: string
    wordCount: number
    readingTime: number
    sectionsCount: number
    codeBlocksCount: number
  }
}

export interface DocsData {
  [locale: string]: {
    [docKey: string]: DocContent
  }
}
";
