/// 사용자 등록
pub const INSERT_USER: &str =
    "INSERT INTO users (username) VALUES ($1) RETURNING id, username, created_at";

/// 사용자 조회
pub const GET_USER: &str = "SELECT id, username, created_at FROM users WHERE id = $1";

/// 사용자 삭제 (FK 규칙으로 상품 참조 정리)
pub const DELETE_USER: &str = "DELETE FROM users WHERE id = $1";

/// 상품 등록
pub const INSERT_LISTING: &str = r#"
    INSERT INTO listings (title, description, start_bid, image_url, category, owner_id, created_at, status)
    VALUES ($1, $2, $3, $4, $5, $6, $7, 'active')
    RETURNING id, title, description, start_bid, image_url, category, owner_id, created_at, closed_at, status, winner_id
"#;

/// 상품 조회
pub const GET_LISTING: &str = r#"
    SELECT id, title, description, start_bid, image_url, category, owner_id, created_at, closed_at, status, winner_id
    FROM listings
    WHERE id = $1
"#;

/// 상태별 상품 조회
pub const GET_LISTINGS_BY_STATUS: &str = r#"
    SELECT id, title, description, start_bid, image_url, category, owner_id, created_at, closed_at, status, winner_id
    FROM listings
    WHERE status = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 모든 상품 조회
pub const GET_ALL_LISTINGS: &str = r#"
    SELECT id, title, description, start_bid, image_url, category, owner_id, created_at, closed_at, status, winner_id
    FROM listings
    ORDER BY created_at DESC, id DESC
"#;

/// 상품 삭제 (입찰, 댓글, 관심 목록 cascade)
pub const DELETE_LISTING: &str = "DELETE FROM listings WHERE id = $1";

/// 경매 종료 상태 저장 (LOCK_LISTING 이후 같은 트랜잭션에서)
pub const FINISH_LISTING: &str = r#"
    UPDATE listings
    SET status = $2, winner_id = $3, closed_at = $4
    WHERE id = $1
"#;

/// 입찰, 종료 전 상품 행 잠금
pub const LOCK_LISTING: &str = r#"
    SELECT id, title, description, start_bid, image_url, category, owner_id, created_at, closed_at, status, winner_id
    FROM listings
    WHERE id = $1
    FOR UPDATE
"#;

/// 최고 입찰 조회 (동일 금액은 먼저 들어온 입찰)
pub const GET_HIGHEST_BID: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY amount DESC, id ASC
    LIMIT 1
"#;

/// 입찰 이력 조회
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, listing_id, bidder_id, amount, created_at
    FROM bids
    WHERE listing_id = $1
    ORDER BY id DESC
"#;

/// 입찰 등록
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (listing_id, bidder_id, amount, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, listing_id, bidder_id, amount, created_at
"#;

/// 댓글 등록
pub const INSERT_COMMENT: &str = r#"
    INSERT INTO comments (listing_id, author_id, content, created_at)
    VALUES ($1, $2, $3, $4)
    RETURNING id, listing_id, author_id, content, created_at
"#;

/// 댓글 조회
pub const GET_COMMENTS: &str = r#"
    SELECT id, listing_id, author_id, content, created_at
    FROM comments
    WHERE listing_id = $1
    ORDER BY created_at DESC, id DESC
"#;

/// 관심 여부 조회
pub const IS_WATCHING: &str =
    "SELECT EXISTS (SELECT 1 FROM watchers WHERE listing_id = $1 AND user_id = $2) AS watching";

/// 관심 목록 추가
pub const ADD_WATCHER: &str =
    "INSERT INTO watchers (listing_id, user_id) VALUES ($1, $2) ON CONFLICT DO NOTHING";

/// 관심 목록 제거
pub const REMOVE_WATCHER: &str = "DELETE FROM watchers WHERE listing_id = $1 AND user_id = $2";

/// 상품 관심 사용자 조회
pub const GET_WATCHERS: &str =
    "SELECT user_id FROM watchers WHERE listing_id = $1 ORDER BY user_id";

/// 사용자 관심 상품 조회
pub const GET_WATCHED_LISTINGS: &str = r#"
    SELECT l.id, l.title, l.description, l.start_bid, l.image_url, l.category, l.owner_id, l.created_at, l.closed_at, l.status, l.winner_id
    FROM listings l
    JOIN watchers w ON w.listing_id = l.id
    WHERE w.user_id = $1
    ORDER BY l.created_at DESC, l.id DESC
"#;
