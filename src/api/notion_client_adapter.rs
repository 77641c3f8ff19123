// src/api/notion_client_adapter.rs
//! Adapter layer for converting notion-client types to the blog's domain model.
//!
//! Index rows become `PostRecord`s by reading the well-known columns; blocks
//! and rich text are trimmed down to what a blog page can render.

use crate::constants::{
    COLUMN_AUTHORS, COLUMN_DATE, COLUMN_PUBLISHED, COLUMN_SLUG, COLUMN_TITLE,
};
use crate::error::{AppError, NotionClientError};
use crate::model::blocks::*;
use crate::model::common::BlockCommon;
use crate::model::{Block, PostRecord, UserRecord};
use crate::types::{
    plain_text_of, Annotations, BlockId, Color, DateValue, EquationData, Link, MentionData,
    MentionType, PageId, PageReference, PartialUser, RichTextItem, RichTextType, Slug, UserId,
};
use notion_client::objects::page::{DateOrDateTime, PageProperty, SelectPropertyValue};
use std::collections::HashMap;

type Properties = HashMap<String, PageProperty>;

/// Convert one blog index row into a post record.
///
/// Fails when the row has no usable slug; callers skip such rows.
pub fn convert_post_record(
    notion_page: notion_client::objects::page::Page,
) -> Result<PostRecord, AppError> {
    let id = PageId::parse(&notion_page.id)?;
    let properties = notion_page.properties;

    let slug = Slug::new(text_property(&properties, COLUMN_SLUG).unwrap_or_default())?;
    let title = extract_title(&properties)?;

    let mut record = PostRecord::new(id, slug, title)
        .published(published_flag(properties.get(COLUMN_PUBLISHED)));

    if let Some(PageProperty::Date {
        date: Some(date), ..
    }) = properties.get(COLUMN_DATE)
    {
        record.date = date.start.clone().map(resolve_date);
    }

    if let Some(PageProperty::People { people, .. }) = properties.get(COLUMN_AUTHORS) {
        let authors = people
            .iter()
            .map(|user| UserId::parse(&user.id))
            .collect::<Result<Vec<_>, _>>()?;
        record.authors = Some(authors);
    }

    Ok(record)
}

/// Reads the title column, falling back to whichever property is the title.
fn extract_title(properties: &Properties) -> Result<String, AppError> {
    let title = match properties.get(COLUMN_TITLE) {
        Some(PageProperty::Title { title, .. }) => Some(title),
        _ => properties.values().find_map(|property| match property {
            PageProperty::Title { title, .. } => Some(title),
            _ => None,
        }),
    };

    match title {
        Some(title) => Ok(plain_text_of(&convert_rich_text_array(title.clone())?)),
        None => Ok(String::new()),
    }
}

/// Plain text of a text-like column, `None` when it is absent or not text.
fn text_property(properties: &Properties, name: &str) -> Option<String> {
    let rich_text = match properties.get(name)? {
        PageProperty::RichText { rich_text, .. } => rich_text,
        PageProperty::Title { title, .. } => title,
        _ => return None,
    };
    convert_rich_text_array(rich_text.clone())
        .ok()
        .map(|items| plain_text_of(&items))
}

/// A post is published when its column is a ticked checkbox or a
/// select/status set to "Yes" or "Published".
pub(crate) fn published_flag(property: Option<&PageProperty>) -> bool {
    fn option_is_published(option: &Option<SelectPropertyValue>) -> bool {
        option
            .as_ref()
            .and_then(|value| value.name.as_deref())
            .map(|name| {
                let name = name.trim();
                name.eq_ignore_ascii_case("yes") || name.eq_ignore_ascii_case("published")
            })
            .unwrap_or(false)
    }

    match property {
        Some(PageProperty::Checkbox { checkbox, .. }) => *checkbox,
        Some(PageProperty::Select { select, .. }) => option_is_published(select),
        Some(PageProperty::Status { status, .. }) => option_is_published(status),
        _ => false,
    }
}

fn resolve_date(dod: DateOrDateTime) -> chrono::NaiveDate {
    match dod {
        DateOrDateTime::Date(d) => d,
        DateOrDateTime::DateTime(dt) => dt.date_naive(),
    }
}

/// Convert a workspace user; users without a name are shown by id.
pub fn convert_user(user: notion_client::objects::user::User) -> Result<UserRecord, AppError> {
    let id = UserId::parse(&user.id)?;
    let full_name = match user.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => id.as_str().to_string(),
    };
    Ok(UserRecord::new(id, full_name))
}

/// Convert notion-client Block to our domain Block
pub fn convert_block(
    notion_block: notion_client::objects::block::Block,
) -> Result<Block, AppError> {
    let common = convert_block_common(&notion_block)?;

    use notion_client::objects::block::BlockType;

    match notion_block.block_type {
        BlockType::Paragraph { paragraph } => Ok(Block::Paragraph(ParagraphBlock {
            common,
            content: convert_text_block_content(paragraph.rich_text, paragraph.color)?,
        })),

        BlockType::Heading1 { heading_1 } => Ok(Block::Heading(HeadingBlock {
            common,
            level: 1,
            content: convert_text_block_content(heading_1.rich_text, heading_1.color)?,
        })),

        BlockType::Heading2 { heading_2 } => Ok(Block::Heading(HeadingBlock {
            common,
            level: 2,
            content: convert_text_block_content(heading_2.rich_text, heading_2.color)?,
        })),

        BlockType::Heading3 { heading_3 } => Ok(Block::Heading(HeadingBlock {
            common,
            level: 3,
            content: convert_text_block_content(heading_3.rich_text, heading_3.color)?,
        })),

        BlockType::BulletedListItem { bulleted_list_item } => {
            Ok(Block::BulletedListItem(BulletedListItemBlock {
                common,
                content: convert_text_block_content(
                    bulleted_list_item.rich_text,
                    Some(bulleted_list_item.color),
                )?,
            }))
        }

        BlockType::NumberedListItem { numbered_list_item } => {
            Ok(Block::NumberedListItem(NumberedListItemBlock {
                common,
                content: convert_text_block_content(
                    numbered_list_item.rich_text,
                    Some(numbered_list_item.color),
                )?,
            }))
        }

        BlockType::Quote { quote } => Ok(Block::Quote(QuoteBlock {
            common,
            content: convert_text_block_content(quote.rich_text, Some(quote.color))?,
        })),

        BlockType::Code { code } => Ok(Block::Code(CodeBlock {
            common,
            content: convert_text_block_content(code.rich_text, None)?,
            language: format!("{:?}", code.language).to_lowercase(),
        })),

        BlockType::Divider { .. } => Ok(Block::Divider(DividerBlock { common })),

        BlockType::Image { image } => {
            use notion_client::objects::file::File as NcFile;
            let url = match image.file_type {
                NcFile::External { external } => external.url,
                NcFile::File { file } => file.url,
            };
            // notion-client drops the caption; the parser fills it from the raw body.
            Ok(Block::Image(ImageBlock {
                common,
                url,
                caption: Vec::new(),
            }))
        }

        other => {
            let block_type = block_type_name(&other);
            log::debug!("Keeping unsupported block type '{}' as a placeholder", block_type);
            Ok(Block::Unsupported(UnsupportedBlock { common, block_type }))
        }
    }
}

/// The API's snake_case name for a block type, read from its serialized tag.
fn block_type_name(block_type: &notion_client::objects::block::BlockType) -> String {
    serde_json::to_value(block_type)
        .ok()
        .and_then(|value| {
            value
                .get("type")
                .and_then(|t| t.as_str())
                .map(str::to_string)
                .or_else(|| value.as_object()?.keys().next().cloned())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

fn convert_block_common(
    notion_block: &notion_client::objects::block::Block,
) -> Result<BlockCommon, AppError> {
    let id = BlockId::parse(&notion_block.id.clone().ok_or_else(|| {
        NotionClientError::ConversionError {
            message: "Block missing required ID field".to_string(),
        }
    })?)?;

    Ok(BlockCommon {
        id,
        children: Vec::new(),
        has_children: notion_block.has_children.unwrap_or(false),
    })
}

fn convert_text_block_content(
    rich_text: Vec<notion_client::objects::rich_text::RichText>,
    color: Option<notion_client::objects::block::TextColor>,
) -> Result<TextBlockContent, AppError> {
    Ok(TextBlockContent {
        rich_text: convert_rich_text_array(rich_text)?,
        color: color.map(convert_block_color).unwrap_or_default(),
    })
}

pub(crate) fn convert_rich_text_array(
    rich_texts: Vec<notion_client::objects::rich_text::RichText>,
) -> Result<Vec<RichTextItem>, AppError> {
    rich_texts.into_iter().map(convert_rich_text).collect()
}

fn convert_rich_text(
    rich_text: notion_client::objects::rich_text::RichText,
) -> Result<RichTextItem, AppError> {
    use notion_client::objects::rich_text::RichText as NcRichText;

    match rich_text {
        NcRichText::Text {
            text,
            annotations,
            plain_text,
            href,
        } => Ok(RichTextItem {
            plain_text: plain_text.unwrap_or_else(|| text.content.clone()),
            text_type: RichTextType::Text {
                content: text.content,
                link: text.link.map(|link| Link { url: link.url }),
            },
            annotations: convert_annotations(annotations.unwrap_or_default()),
            href,
        }),

        NcRichText::Mention {
            mention,
            annotations,
            plain_text,
            href,
        } => {
            // Mentions the blog can't render degrade to a link on their href,
            // or to plain text when there is none.
            let text_type = match convert_mention(mention) {
                Some(mention_data) => RichTextType::Mention(mention_data),
                None => RichTextType::Text {
                    content: plain_text.clone(),
                    link: href.clone().map(|url| Link { url }),
                },
            };

            Ok(RichTextItem {
                text_type,
                annotations: convert_annotations(annotations),
                plain_text,
                href,
            })
        }

        NcRichText::Equation {
            equation,
            annotations,
            plain_text,
            href,
        } => Ok(RichTextItem {
            text_type: RichTextType::Equation(EquationData {
                expression: equation.expression,
            }),
            annotations: convert_annotations(annotations),
            plain_text,
            href,
        }),

        _ => {
            log::debug!("Dropping unsupported rich text item");
            Ok(RichTextItem::plain_text(""))
        }
    }
}

fn convert_annotations(annotations: notion_client::objects::rich_text::Annotations) -> Annotations {
    Annotations {
        bold: annotations.bold,
        italic: annotations.italic,
        strikethrough: annotations.strikethrough,
        underline: annotations.underline,
        code: annotations.code,
        color: convert_rich_text_color(annotations.color),
    }
}

fn convert_mention(mention: notion_client::objects::rich_text::Mention) -> Option<MentionData> {
    use notion_client::objects::rich_text::Mention as NcMention;

    let mention_type = match mention {
        NcMention::User { user } => MentionType::User {
            user: PartialUser {
                id: user.id,
                name: user.name,
                avatar_url: user.avator_url,
            },
        },
        NcMention::Page { page } => MentionType::Page {
            page: PageReference {
                id: PageId::parse(&page.id).ok()?,
            },
        },
        NcMention::Date { date } => MentionType::Date {
            date: DateValue {
                start: date.start.naive_utc().date(),
                end: date.end.map(|end| end.naive_utc().date()),
                time_zone: date.time_zone,
            },
        },
        NcMention::LinkPreview { link_preview } => MentionType::Link {
            url: link_preview.url,
        },
        _ => return None,
    };

    Some(MentionData { mention_type })
}

macro_rules! impl_color_conversion {
    ($fn_name:ident, $source:ty) => {
        fn $fn_name(color: $source) -> Color {
            match color {
                <$source>::Default => Color::Default,
                <$source>::Gray => Color::Gray,
                <$source>::Brown => Color::Brown,
                <$source>::Orange => Color::Orange,
                <$source>::Yellow => Color::Yellow,
                <$source>::Green => Color::Green,
                <$source>::Blue => Color::Blue,
                <$source>::Purple => Color::Purple,
                <$source>::Pink => Color::Pink,
                <$source>::Red => Color::Red,
                <$source>::GrayBackground => Color::GrayBackground,
                <$source>::BrownBackground => Color::BrownBackground,
                <$source>::OrangeBackground => Color::OrangeBackground,
                <$source>::YellowBackground => Color::YellowBackground,
                <$source>::GreenBackground => Color::GreenBackground,
                <$source>::BlueBackground => Color::BlueBackground,
                <$source>::PurpleBackground => Color::PurpleBackground,
                <$source>::PinkBackground => Color::PinkBackground,
                <$source>::RedBackground => Color::RedBackground,
            }
        }
    };
}

impl_color_conversion!(convert_block_color, notion_client::objects::block::TextColor);
impl_color_conversion!(
    convert_rich_text_color,
    notion_client::objects::rich_text::TextColor
);
