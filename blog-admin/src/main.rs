mod logging;
mod settings;

use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use blog_api::models::{
    Category, CategoryWithCount, Comment, CommentAdminDeleteRequest, CommentDeleteRequest,
    CommentWriteRequest, ImageItem, ImageUpload, PostItem, PostStatus, PostWriteRequest,
};
use blog_api::repository::AdminPostFilter;
use blog_api::{ApiError, BlogClient, BlogClientError, FileStore, GateUi, Page};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::logging::init_logging;
use crate::settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "blog-admin", version, about = "CLI администратора блога")]
struct Cli {
    /// Адрес API (перекрывает BLOG_API_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Вход администратора.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Выход и сброс локальной сессии.
    Logout,
    /// Проверка сессии на сервере.
    Status,
    /// Посты.
    #[command(subcommand)]
    Posts(PostsCommand),
    /// Категории.
    #[command(subcommand)]
    Categories(CategoriesCommand),
    /// Комментарии.
    #[command(subcommand)]
    Comments(CommentsCommand),
    /// Изображения (только админка).
    #[command(subcommand)]
    Images(ImagesCommand),
}

#[derive(Debug, Subcommand)]
enum PostsCommand {
    /// Опубликованные посты.
    List {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Посты категории.
    Category {
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Пост по id.
    Get {
        #[arg(long)]
        id: i64,
    },
    /// Все посты в админке, с фильтрами.
    AdminList {
        #[arg(long)]
        status: Option<PostStatus>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Создание поста.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category_id: i64,
        #[arg(long, default_value = "draft")]
        status: PostStatus,
    },
    /// Обновление поста.
    ///
    /// Не указанные поля берутся из текущей версии поста.
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category_id: Option<i64>,
        #[arg(long)]
        status: Option<PostStatus>,
    },
    /// Удаление поста.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum CategoriesCommand {
    /// Список категорий.
    List,
    /// Категории с количеством постов.
    Stats,
    /// Создание категории.
    Create {
        #[arg(long)]
        name: String,
    },
    /// Переименование категории.
    Rename {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
    },
    /// Удаление категории.
    Delete {
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum CommentsCommand {
    /// Комментарии поста (деревом).
    List {
        #[arg(long)]
        post_id: i64,
    },
    /// Новый комментарий или ответ.
    Write {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        content: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        parent_id: Option<i64>,
    },
    /// Удаление своего комментария.
    Delete {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Все комментарии в админке.
    AdminList {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        size: u32,
    },
    /// Удаление любого комментария администратором.
    AdminDelete {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        id: i64,
    },
}

#[derive(Debug, Subcommand)]
enum ImagesCommand {
    /// Загрузка файла.
    Upload {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        folder: Option<String>,
    },
    /// Список изображений.
    List {
        #[arg(long)]
        folder: Option<String>,
    },
    /// Удаление изображения.
    Delete {
        #[arg(long)]
        public_id: String,
    },
}

/// Вывод гейта в терминал: вместо перехода на страницу входа подсказываем команду.
struct CliUi;

impl GateUi for CliUi {
    fn warn(&self, message: &str) {
        eprintln!("Внимание: {message}");
    }

    fn redirect(&self, path: &str) {
        debug!(path, "login redirect");
        eprintln!("Выполните `blog-admin login --username ... --password ...`");
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let settings = Settings::from_env()?;
    init_logging(&settings.log_level)?;

    let config = settings.client_config(cli.server)?;
    let storage = Arc::new(FileStore::new(&settings.session_dir));
    let client = BlogClient::connect(config, storage)
        .await
        .map_err(map_client_error)?;

    match cli.command {
        Command::Login { username, password } => {
            let response = client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            println!("Вход выполнен");
            println!("user_id: {}", response.user_id);
            println!("username: {}", response.username);
            if !response.message.is_empty() {
                println!("message: {}", response.message);
            }
        }
        Command::Logout => {
            client.logout().await.map_err(map_client_error)?;
            println!("Сессия завершена");
        }
        Command::Status => {
            if let Some(record) = client.session().current().await {
                println!("Локальная сессия: user_id={}", record.user_id);
            } else {
                println!("Локальной сессии нет");
            }
            ensure_admin(&client).await?;
            println!("Сессия подтверждена сервером");
        }
        Command::Posts(command) => run_posts(&client, command).await?,
        Command::Categories(command) => run_categories(&client, command).await?,
        Command::Comments(command) => run_comments(&client, command).await?,
        Command::Images(command) => run_images(&client, command).await?,
    }

    Ok(())
}

async fn run_posts(client: &BlogClient, command: PostsCommand) -> Result<()> {
    let posts = client.posts();
    match command {
        PostsCommand::List { page, size } => {
            let page = posts.page(page, size).await.map_err(map_api_error)?;
            print_page("Постов", &page, print_post_line);
        }
        PostsCommand::Category { name, page, size } => {
            let page = posts
                .category_page(&name, page, size)
                .await
                .map_err(map_api_error)?;
            print_page(&format!("Постов в «{name}»"), &page, print_post_line);
        }
        PostsCommand::Get { id } => {
            let post = posts.single(id).await.map_err(map_api_error)?;
            print_post("Пост", &post);
        }
        PostsCommand::AdminList {
            status,
            category,
            page,
            size,
        } => {
            ensure_admin(client).await?;
            let filter = AdminPostFilter {
                status,
                category_name: category,
            };
            let page = posts
                .admin_page(&filter, page, size)
                .await
                .map_err(map_api_error)?;
            print_page("Постов", &page, print_post_line);
        }
        PostsCommand::Create {
            title,
            content,
            category_id,
            status,
        } => {
            ensure_admin(client).await?;
            let request = PostWriteRequest {
                title,
                content,
                category_id,
                status,
            };
            let post = posts.create(&request).await.map_err(map_api_error)?;
            print_post("Пост создан", &post);
        }
        PostsCommand::Update {
            id,
            title,
            content,
            category_id,
            status,
        } => {
            ensure_admin(client).await?;
            let current = posts.admin_single(id).await.map_err(map_api_error)?;
            let request = merge_post_update(current, title, content, category_id, status)?;
            let post = posts.update(id, &request).await.map_err(map_api_error)?;
            print_post("Пост обновлён", &post);
        }
        PostsCommand::Delete { id } => {
            ensure_admin(client).await?;
            posts.delete(id).await.map_err(map_api_error)?;
            println!("Пост удалён: id={id}");
        }
    }
    Ok(())
}

async fn run_categories(client: &BlogClient, command: CategoriesCommand) -> Result<()> {
    let categories = client.categories();
    match command {
        CategoriesCommand::List => {
            let list = categories.list().await.map_err(map_api_error)?;
            println!("Категорий: {}", list.len());
            for category in &list {
                print_category_line(category);
            }
        }
        CategoriesCommand::Stats => {
            let list = categories.list_with_count().await.map_err(map_api_error)?;
            println!("Категорий: {}", list.len());
            for category in &list {
                print_category_count_line(category);
            }
        }
        CategoriesCommand::Create { name } => {
            ensure_admin(client).await?;
            let category = categories.create(&name).await.map_err(map_api_error)?;
            println!("Категория создана");
            print_category_line(&category);
        }
        CategoriesCommand::Rename { id, name } => {
            ensure_admin(client).await?;
            let category = categories.rename(id, &name).await.map_err(map_api_error)?;
            println!("Категория переименована");
            print_category_line(&category);
        }
        CategoriesCommand::Delete { id } => {
            ensure_admin(client).await?;
            categories.delete(id).await.map_err(map_api_error)?;
            println!("Категория удалена: id={id}");
        }
    }
    Ok(())
}

async fn run_comments(client: &BlogClient, command: CommentsCommand) -> Result<()> {
    let comments = client.comments();
    match command {
        CommentsCommand::List { post_id } => {
            let list = comments.list(post_id).await.map_err(map_api_error)?;
            let total: usize = list.iter().map(Comment::thread_len).sum();
            println!("Комментариев: {total}");
            for comment in &list {
                print_comment_tree(comment, 0);
            }
        }
        CommentsCommand::Write {
            post_id,
            content,
            email,
            password,
            parent_id,
        } => {
            let request = CommentWriteRequest {
                content,
                email,
                password,
                post_id,
                parent_id,
            };
            let comment = comments.write(&request).await.map_err(map_api_error)?;
            println!("Комментарий добавлен");
            print_comment_tree(&comment, 0);
        }
        CommentsCommand::Delete {
            id,
            email,
            password,
        } => {
            let request = CommentDeleteRequest {
                comment_id: id,
                email,
                password,
            };
            comments.delete(&request).await.map_err(map_api_error)?;
            println!("Комментарий удалён: id={id}");
        }
        CommentsCommand::AdminList { page, size } => {
            ensure_admin(client).await?;
            let page = comments.admin_page(page, size).await.map_err(map_api_error)?;
            print_page("Комментариев", &page, |comment| print_comment_tree(comment, 0));
        }
        CommentsCommand::AdminDelete { post_id, id } => {
            ensure_admin(client).await?;
            let thread = comments.list(post_id).await.map_err(map_api_error)?;
            let comment = find_comment(&thread, id)
                .ok_or_else(|| anyhow!("комментарий {id} не найден в посте {post_id}"))?;
            comments
                .admin_delete(&CommentAdminDeleteRequest::from(comment))
                .await
                .map_err(map_api_error)?;
            println!("Комментарий удалён: id={id}");
        }
    }
    Ok(())
}

async fn run_images(client: &BlogClient, command: ImagesCommand) -> Result<()> {
    ensure_admin(client).await?;
    let images = client.images();
    match command {
        ImagesCommand::Upload { file, folder } => {
            let upload = read_upload(&file, folder).await?;
            let response = images.upload(&upload).await.map_err(map_api_error)?;
            println!("Изображение загружено");
            println!("public_id: {}", response.public_id);
            println!("url: {}", response.secure_url);
            println!("size: {}x{} ({} bytes)", response.width, response.height, response.bytes);
        }
        ImagesCommand::List { folder } => {
            let list = images.list(folder.as_deref()).await.map_err(map_api_error)?;
            println!("Изображений: {} (folder={})", list.count, list.folder);
            for image in &list.images {
                print_image_line(image);
            }
        }
        ImagesCommand::Delete { public_id } => {
            images.delete(&public_id).await.map_err(map_api_error)?;
            println!("Изображение удалено: {public_id}");
        }
    }
    Ok(())
}

async fn ensure_admin(client: &BlogClient) -> Result<()> {
    let gate = client.gate(Arc::new(CliUi));
    if !gate.verify().await {
        bail!("нет доступа к админке");
    }
    Ok(())
}

async fn read_upload(path: &Path, folder: Option<String>) -> Result<ImageUpload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("не удалось прочитать {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("некорректное имя файла: {}", path.display()))?
        .to_string();

    Ok(ImageUpload {
        mime: guess_mime(&file_name).map(str::to_string),
        file_name,
        bytes: Some(bytes),
        folder,
    })
}

fn guess_mime(file_name: &str) -> Option<&'static str> {
    let (_, extension) = file_name.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

fn merge_post_update(
    current: PostItem,
    title: Option<String>,
    content: Option<String>,
    category_id: Option<i64>,
    status: Option<PostStatus>,
) -> Result<PostWriteRequest> {
    let category_id = category_id
        .or(current.category_id)
        .ok_or_else(|| anyhow!("у поста нет категории: укажите --category-id"))?;

    Ok(PostWriteRequest {
        title: title.unwrap_or(current.title),
        content: content.unwrap_or(current.content),
        category_id,
        status: status.unwrap_or(current.status),
    })
}

fn find_comment(thread: &[Comment], id: i64) -> Option<&Comment> {
    thread.iter().find_map(|comment| {
        if comment.id == id {
            Some(comment)
        } else {
            find_comment(&comment.replies, id)
        }
    })
}

fn map_api_error(err: ApiError) -> anyhow::Error {
    if err.is_unauthorized() {
        return anyhow!(
            "{}\nтребуется авторизация: выполните `blog-admin login ...`",
            err.notice()
        );
    }
    anyhow!(err.notice())
}

fn map_client_error(err: BlogClientError) -> anyhow::Error {
    match err {
        BlogClientError::Api(err) => map_api_error(err),
        BlogClientError::Storage(err) => anyhow!("ошибка локальной сессии: {err}"),
        BlogClientError::Http(err) => anyhow!("ошибка HTTP клиента: {err}"),
        BlogClientError::Config(message) => anyhow!("некорректная конфигурация: {message}"),
    }
}

fn print_page<T>(title: &str, page: &Page<T>, print_item: impl Fn(&T)) {
    println!(
        "{title}: {} (page={}, size={}, total={}, pages={})",
        page.items.len(),
        page.page_number,
        page.page_size,
        page.total_elements,
        page.total_pages
    );
    for item in &page.items {
        print_item(item);
    }
    if let Some(next) = page.next_page() {
        println!("Следующая страница: --page {next}");
    }
}

fn print_post(title: &str, post: &PostItem) {
    println!("{title}");
    println!("id: {}", post.id);
    println!("title: {}", post.title);
    println!("status: {}", post.status.as_str());
    println!("category: {}", post.category_name);
    println!("content: {}", post.content);
    match post.registered_at() {
        Some(at) => println!("created_at: {at}"),
        None => println!("created_at: {}", post.reg_date),
    }
    if let Some(modified) = &post.modify_date {
        println!("updated_at: {modified}");
    }
}

fn print_post_line(post: &PostItem) {
    println!(
        "- [{}] {} ({}, {})",
        post.id,
        post.title,
        post.status.as_str(),
        post.category_name
    );
}

fn print_category_line(category: &Category) {
    println!("- [{}] {}", category.id, category.name);
}

fn print_category_count_line(category: &CategoryWithCount) {
    println!(
        "- [{}] {} (posts={})",
        category.id, category.name, category.post_count
    );
}

fn print_comment_tree(comment: &Comment, depth: usize) {
    let indent = "  ".repeat(depth);
    let date = comment
        .registered_at()
        .map(|at| at.to_string())
        .unwrap_or_else(|| comment.reg_date.clone());
    println!(
        "{indent}- [{}] {} ({date}): {}",
        comment.id, comment.email, comment.content
    );
    for reply in &comment.replies {
        print_comment_tree(reply, depth + 1);
    }
}

fn print_image_line(image: &ImageItem) {
    let created = image
        .created()
        .map(|at| at.to_string())
        .unwrap_or_else(|| image.created_at.clone());
    println!(
        "- {} {}x{} {} {created} ({})",
        image.public_id, image.width, image.height, image.format, image.secure_url
    );
}
